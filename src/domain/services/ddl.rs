//! # DDL Service
//!
//! テーブル定義からウェアハウスごとのCREATE文を組み立てる

use crate::domain::entities::column::ColumnType;
use crate::domain::entities::table_definition::TableDefinition;
use crate::domain::entities::warehouse::Warehouse;
use crate::domain::error::SheetLoadError;

/// DDL生成サービス
pub struct DdlService;

impl DdlService {
    /// ウェアハウスのDDLで使う型名
    pub fn type_name(warehouse: Warehouse, column_type: ColumnType) -> &'static str {
        match warehouse {
            Warehouse::BigQuery => match column_type {
                ColumnType::Integer => "INT64",
                ColumnType::Float => "FLOAT64",
                ColumnType::String => "STRING",
                ColumnType::Boolean => "BOOL",
                ColumnType::Date => "DATE",
                ColumnType::Timestamp => "TIMESTAMP",
                ColumnType::Time => "TIME",
            },
            Warehouse::Snowflake => column_type.name(),
        }
    }

    /// `CREATE OR REPLACE TABLE` 文を生成する
    ///
    /// # Arguments
    ///
    /// * `warehouse` - ロード先ウェアハウス
    /// * `qualified_name` - 修飾済みテーブル名（BigQueryは `project.dataset.table`）
    /// * `definition` - テーブル定義
    ///
    /// # Errors
    ///
    /// フィールドが1つもない場合にエラーを返す
    pub fn create_table(
        warehouse: Warehouse,
        qualified_name: &str,
        definition: &TableDefinition,
    ) -> Result<String, SheetLoadError> {
        if definition.fields.is_empty() {
            return Err(SheetLoadError::EmptyTableDefinition(
                definition.table_name.clone(),
            ));
        }

        let columns: Vec<String> = definition
            .fields
            .iter()
            .map(|f| format!("{} {}", f.name, Self::type_name(warehouse, f.column_type)))
            .collect();

        let table = match warehouse {
            Warehouse::BigQuery => format!("`{}`", qualified_name),
            Warehouse::Snowflake => qualified_name.to_string(),
        };

        Ok(format!(
            "CREATE OR REPLACE TABLE {} ({})",
            table,
            columns.join(", ")
        ))
    }

    /// テーブル名を検証する
    ///
    /// `.` 区切りで1〜3要素、各要素は英字か `_` で始まる。
    /// Snowflakeは英数字・`_`・`$`、BigQueryは英数字・`_` のみ。
    /// `-` はBigQueryのプロジェクト部分（3要素の先頭）でだけ使える。
    pub fn validate_table_name(name: &str, warehouse: Warehouse) -> Result<(), SheetLoadError> {
        let parts: Vec<&str> = name.split('.').collect();
        let valid = (1..=3).contains(&parts.len())
            && parts.iter().enumerate().all(|(i, part)| {
                let is_project = warehouse == Warehouse::BigQuery && parts.len() == 3 && i == 0;
                is_identifier(part, |c| match warehouse {
                    Warehouse::Snowflake => c == '_' || c == '$',
                    Warehouse::BigQuery if is_project => c == '-',
                    Warehouse::BigQuery => c == '_',
                })
            });

        if valid {
            Ok(())
        } else {
            Err(SheetLoadError::InvalidTableName(name.to_string()))
        }
    }
}

/// 英字か `_` で始まり、以降は英数字か `extra` が許す記号
fn is_identifier(part: &str, extra: impl Fn(char) -> bool) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || extra(c))
        }
        _ => false,
    }
}
