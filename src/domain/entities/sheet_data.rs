//! # SheetData Entity
//!
//! 列定義と行データからなる表

use super::cell::CellValue;
use super::column::Column;

/// 表データ
///
/// 全ての行は列数と同じ長さを持つ
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    /// 新しい表を作成
    ///
    /// 列数より短い行はNullで埋め、長い行は切り詰める
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 列名から列番号を探す
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// 指定列のセルを取り出す
    pub fn column_cells(&self, index: usize) -> Vec<CellValue> {
        self.rows.iter().map(|row| row[index].clone()).collect()
    }

    /// 指定列のセルを置き換える
    ///
    /// `cells` の長さは行数と一致している必要がある
    pub fn replace_column_cells(&mut self, index: usize, cells: Vec<CellValue>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row[index] = cell;
        }
    }

    /// 全てのセルに関数を適用
    pub fn map_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(CellValue) -> CellValue,
    {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                let value = std::mem::replace(cell, CellValue::Null);
                *cell = f(value);
            }
        }
    }
}
