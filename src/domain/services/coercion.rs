//! # Coercion Service
//!
//! 確定した列型に合わせてセル値を変換する

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::entities::cell::{CellValue, TIMESTAMP_FORMAT};
use crate::domain::entities::column::ColumnType;
use crate::domain::entities::sheet_data::SheetData;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%b %d, %Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

// Excel serial dates count days from 1899-12-30; 2958465 is 9999-12-31.
const EXCEL_MAX_SERIAL: f64 = 2_958_466.0;

/// 型変換サービス
pub struct CoercionService;

impl CoercionService {
    /// 表の全ての列を確定済みの型に変換する
    pub fn coerce_sheet(data: &mut SheetData) {
        let targets: Vec<ColumnType> = data.columns().iter().map(|c| c.column_type).collect();
        for (index, target) in targets.into_iter().enumerate() {
            let cells = data.column_cells(index);
            data.replace_column_cells(index, Self::coerce_column(cells, target));
        }
    }

    /// 1列分のセルを変換する
    pub fn coerce_column(cells: Vec<CellValue>, target: ColumnType) -> Vec<CellValue> {
        cells
            .into_iter()
            .map(|cell| Self::coerce_cell(cell, target))
            .collect()
    }

    /// セル1つを変換する
    ///
    /// - INTEGER: 変換できない値・空は0、小数は0方向に切り捨て
    /// - FLOAT: 変換できない値は空
    /// - DATE / TIMESTAMP / TIME: 書式化した文字列、変換できない値は空
    /// - BOOLEAN: 変換できない値は空
    /// - STRING: テキスト表現（空は空のまま）
    pub fn coerce_cell(cell: CellValue, target: ColumnType) -> CellValue {
        match target {
            ColumnType::Integer => CellValue::Int(to_integer(&cell)),
            ColumnType::Float => cell.as_f64().map_or(CellValue::Null, CellValue::Float),
            ColumnType::String => {
                if cell.is_null() {
                    CellValue::Null
                } else {
                    CellValue::String(cell.to_text())
                }
            }
            ColumnType::Boolean => to_bool(&cell).map_or(CellValue::Null, CellValue::Bool),
            ColumnType::Date => format_datetime(&cell, DATE_FORMAT),
            ColumnType::Timestamp => format_datetime(&cell, TIMESTAMP_FORMAT),
            ColumnType::Time => match to_time(&cell) {
                Some(t) => CellValue::String(t.format(TIME_FORMAT).to_string()),
                None => CellValue::Null,
            },
        }
    }
}

fn to_integer(cell: &CellValue) -> i64 {
    match cell {
        CellValue::Int(i) => *i,
        // Rustのf64→i64キャストは飽和する
        _ => cell.as_f64().map_or(0, |f| f.trunc() as i64),
    }
}

fn to_bool(cell: &CellValue) -> Option<bool> {
    match cell {
        CellValue::Bool(b) => Some(*b),
        CellValue::Int(i) => Some(*i != 0),
        CellValue::Float(f) if f.is_finite() => Some(*f != 0.0),
        CellValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "0" => Some(false),
            other => other.parse::<f64>().ok().map(|f| f != 0.0),
        },
        _ => None,
    }
}

fn format_datetime(cell: &CellValue, format: &str) -> CellValue {
    match to_datetime(cell) {
        Some(dt) => CellValue::String(dt.format(format).to_string()),
        None => CellValue::Null,
    }
}

/// セルを日時として解釈する
pub fn to_datetime(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Int(i) => from_excel_serial(*i as f64),
        CellValue::Float(f) => from_excel_serial(*f),
        CellValue::String(s) => parse_datetime(s),
        _ => None,
    }
}

fn to_time(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::String(s) => {
            let s = s.trim();
            TIME_FORMATS
                .iter()
                .find_map(|f| NaiveTime::parse_from_str(s, f).ok())
                .or_else(|| parse_datetime(s).map(|dt| dt.time()))
        }
        // 時刻のみのExcelセルは1未満のシリアル値
        CellValue::Float(f) if (0.0..1.0).contains(f) => from_excel_serial(*f).map(|dt| dt.time()),
        other => to_datetime(other).map(|dt| dt.time()),
    }
}

/// 文字列を日時として解釈する
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Excelのシリアル値を日時に変換する
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial >= EXCEL_MAX_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
