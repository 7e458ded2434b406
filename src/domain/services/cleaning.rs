//! # Cleaning Service
//!
//! 文字列セルの空白を整える

use crate::domain::entities::cell::CellValue;
use crate::domain::entities::sheet_data::SheetData;

/// クリーニングサービス
pub struct CleaningService;

impl CleaningService {
    /// 文字列の空白の連続を1つの空白にまとめ、前後の空白を除く
    pub fn collapse_whitespace(value: &str) -> String {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// セル1つをクリーニングする（文字列以外はそのまま）
    pub fn clean_cell(cell: CellValue) -> CellValue {
        match cell {
            CellValue::String(s) => CellValue::String(Self::collapse_whitespace(&s)),
            other => other,
        }
    }

    /// 表の全ての文字列セルをクリーニングする
    pub fn clean(data: &mut SheetData) {
        data.map_cells(Self::clean_cell);
    }
}
