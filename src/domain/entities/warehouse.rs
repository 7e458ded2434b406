//! # Warehouse
//!
//! ロード先ウェアハウスの種類

use std::fmt;

use super::column::ColumnType;

/// ロード先ウェアハウス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warehouse {
    BigQuery,
    Snowflake,
}

impl Warehouse {
    /// オーバーライドで受け付ける型（プロンプトに表示する順）
    pub fn acceptable_types(&self) -> &'static [ColumnType] {
        match self {
            Warehouse::BigQuery => &[
                ColumnType::Integer,
                ColumnType::Float,
                ColumnType::String,
                ColumnType::Timestamp,
                ColumnType::Date,
                ColumnType::Boolean,
            ],
            Warehouse::Snowflake => &[
                ColumnType::Integer,
                ColumnType::Float,
                ColumnType::String,
                ColumnType::Timestamp,
                ColumnType::Date,
                ColumnType::Time,
                ColumnType::Boolean,
            ],
        }
    }

    /// `[int, float, ...]` 形式のキーワード一覧
    pub fn acceptable_keywords(&self) -> String {
        let keywords: Vec<&str> = self
            .acceptable_types()
            .iter()
            .map(ColumnType::keyword)
            .collect();
        format!("[{}]", keywords.join(", "))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Warehouse::BigQuery => "GBQ",
            Warehouse::Snowflake => "Snowflake",
        }
    }
}

impl fmt::Display for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigquery_has_no_time() {
        assert!(!Warehouse::BigQuery
            .acceptable_types()
            .contains(&ColumnType::Time));
        assert!(Warehouse::Snowflake
            .acceptable_types()
            .contains(&ColumnType::Time));
    }

    #[test]
    fn test_acceptable_keywords() {
        assert_eq!(
            Warehouse::BigQuery.acceptable_keywords(),
            "[int, float, string, timestamp, date, bool]"
        );
        assert_eq!(
            Warehouse::Snowflake.acceptable_keywords(),
            "[int, float, string, timestamp, date, time, bool]"
        );
    }
}
