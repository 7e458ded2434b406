//! Staged Load Statements
//!
//! 外部ステージに置いたステージングファイルを読み込むSQL

/// ステージ上のファイルをテーブルに読み込む `COPY INTO`
///
/// `stage` はバケットの先頭を指す外部ステージ、`file` はステージからの相対パス。
/// ヘッダー1行を読み飛ばし、1行でも不正ならロード全体を中止する
pub fn copy_statement(table_name: &str, stage: &str, file: &str, delimiter: u8) -> String {
    format!(
        "COPY INTO {table} FROM {stage} FILES = ('{file}') \
         FILE_FORMAT = (TYPE = 'CSV' FIELD_DELIMITER = '{delimiter}' SKIP_HEADER = 1 \
         FIELD_OPTIONALLY_ENCLOSED_BY = '\"' EMPTY_FIELD_AS_NULL = TRUE) \
         ON_ERROR = 'ABORT_STATEMENT'",
        table = table_name,
        stage = stage_reference(stage),
        file = escape_literal(file),
        delimiter = escape_literal(&char::from(delimiter).to_string()),
    )
}

/// ステージ名に `@` を付ける
pub fn stage_reference(stage: &str) -> String {
    if stage.starts_with('@') {
        stage.to_string()
    } else {
        format!("@{}", stage)
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
