//! # TableDefinition Value Object
//!
//! ロード先テーブルの参照とスキーマ

use super::column::ColumnType;
use super::sheet_data::SheetData;

/// テーブルのフィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub column_type: ColumnType,
}

/// ロード先テーブル定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    /// テーブル名（`db.schema.table` のような修飾名も可）
    pub table_name: String,
    pub fields: Vec<FieldDefinition>,
}

impl TableDefinition {
    /// 表データの確定済み列型からテーブル定義を作る
    pub fn from_sheet(table_name: impl Into<String>, data: &SheetData) -> Self {
        let fields = data
            .columns()
            .iter()
            .map(|c| FieldDefinition {
                name: c.name.clone(),
                column_type: c.column_type,
            })
            .collect();

        Self {
            table_name: table_name.into(),
            fields,
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
