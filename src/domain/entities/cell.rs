//! # CellValue Value Object
//!
//! スプレッドシートのセル値

use chrono::NaiveDateTime;
use std::fmt;

/// 区切りファイル・ウェアハウスへ出力する日時の書式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// セル値
///
/// スプレッドシートから読み込んだ1セル分の値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// 値が空かどうかを返す
    ///
    /// 空白のみの文字列も空として扱う
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 数値として解釈できる場合はf64を返す
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if f.is_finite() => Some(*f),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// 区切りファイル用のテキスト表現
    ///
    /// Nullは空文字列になる
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::String(s) => s.clone(),
            CellValue::DateTime(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// 小数部のないfloatは `.0` 付きで出力する（int列と区別するため）
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return String::new();
    }
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}
