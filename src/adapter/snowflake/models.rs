//! Snowflake SQL API Models
//!
//! `/api/v2/statements` のリクエストとレスポンス

use serde::{Deserialize, Serialize};

/// ステートメント実行時のセッション設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// ステートメント実行リクエスト
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRequest {
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl StatementRequest {
    pub fn new(statement: impl Into<String>, context: &SessionContext) -> Self {
        Self {
            statement: statement.into(),
            timeout: context.timeout_secs,
            database: context.database.clone(),
            schema: context.schema.clone(),
            warehouse: context.warehouse.clone(),
            role: context.role.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetMetaData {
    #[serde(default)]
    pub num_rows: u64,
}

/// ステートメント実行レスポンス
///
/// 成功・実行中（202）・エラー（422など）で共通の形
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    pub sql_state: Option<String>,
    pub statement_handle: Option<String>,
    pub result_set_meta_data: Option<ResultSetMetaData>,
    pub data: Option<Vec<Vec<Option<String>>>>,
}

/// `COPY INTO` の結果列 `rows_loaded` の位置
const COPY_ROWS_LOADED_COLUMN: usize = 3;

impl StatementResponse {
    /// `COPY INTO` で読み込まれた行数（ファイルごとの `rows_loaded` の合計）
    ///
    /// 対象ファイルがなかった場合は結果が1列だけなので0件。結果自体がなければ `None`
    pub fn copied_rows(&self) -> Option<usize> {
        let rows = self.data.as_ref()?;
        Some(
            rows.iter()
                .filter_map(|row| row.get(COPY_ROWS_LOADED_COLUMN)?.as_deref()?.parse::<usize>().ok())
                .sum(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization_skips_unset_fields() {
        let context = SessionContext {
            database: Some("ANALYTICS".to_string()),
            timeout_secs: Some(600),
            ..Default::default()
        };

        let request = StatementRequest::new("SELECT 1", &context);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"statement": "SELECT 1", "timeout": 600, "database": "ANALYTICS"})
        );
    }

    #[test]
    fn test_response_copied_rows() {
        let response: StatementResponse = serde_json::from_value(json!({
            "code": "090001",
            "statementHandle": "01b2-0000",
            "message": "Statement executed successfully.",
            "resultSetMetaData": {"numRows": 1},
            "data": [[
                "gcs://loads/sheetload/SALES_r1.csv", "LOADED", "3", "3",
                "1", "0", null, null, null, null
            ]]
        }))
        .unwrap();

        assert_eq!(response.copied_rows(), Some(3));
        assert_eq!(response.statement_handle.as_deref(), Some("01b2-0000"));
        assert_eq!(response.result_set_meta_data.unwrap().num_rows, 1);
    }

    #[test]
    fn test_response_copied_rows_without_files() {
        let response: StatementResponse = serde_json::from_value(json!({
            "data": [["Copy executed with 0 files processed."]]
        }))
        .unwrap();

        assert_eq!(response.copied_rows(), Some(0));
        assert_eq!(StatementResponse::default().copied_rows(), None);
    }

    #[test]
    fn test_response_error_shape() {
        let response: StatementResponse = serde_json::from_value(json!({
            "code": "002003",
            "sqlState": "42S02",
            "message": "Table 'SALES' does not exist",
            "statementHandle": "01b2-0001"
        }))
        .unwrap();

        assert_eq!(response.sql_state.as_deref(), Some("42S02"));
        assert_eq!(response.copied_rows(), None);
    }
}
