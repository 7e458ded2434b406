//! Retry Logic and Error Classification
//!
//! ウェアハウスAPI共通のリトライ判定とバックオフ

use anyhow::Result;
use log::warn;
use std::future::Future;
use std::time::Duration;

pub const MAX_RETRIES: u32 = 5;
pub const INITIAL_RETRY_DELAY_MS: u64 = 1000;
pub const MAX_RETRY_DELAY_MS: u64 = 32000;

/// 指数バックオフの待機時間（ミリ秒）
///
/// `retry_count` は1始まり
pub fn calculate_retry_delay(retry_count: u32) -> u64 {
    let shift = retry_count.saturating_sub(1).min(16);
    std::cmp::min(INITIAL_RETRY_DELAY_MS << shift, MAX_RETRY_DELAY_MS)
}

/// エラーチェーン全体を1行の文字列にする
pub fn error_chain_to_string(e: &anyhow::Error) -> String {
    e.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// 接続が切れたエラーか
pub fn is_connection_error(error_msg: &str) -> bool {
    const PATTERNS: &[&str] = &[
        "Broken pipe",
        "broken pipe",
        "Connection reset",
        "connection reset",
        "Connection refused",
        "connection refused",
        "connection error",
        "EOF",
        "unexpected end of file",
    ];
    PATTERNS.iter().any(|p| error_msg.contains(p))
}

/// サーバー側の一時的なエラーか
pub fn is_transient_error(error_msg: &str) -> bool {
    const PATTERNS: &[&str] = &[
        "500",
        "502",
        "503",
        "504",
        "403",
        "429",
        "rate",
        "quota",
        "Quota",
        "timeout",
        "Timeout",
        "timed out",
    ];
    PATTERNS.iter().any(|p| error_msg.contains(p))
}

pub fn is_retryable_error(error_msg: &str) -> bool {
    is_connection_error(error_msg) || is_transient_error(error_msg)
}

/// 一時的なエラーの間だけ指数バックオフで再試行する
///
/// # Arguments
///
/// * `label` - ログに出す操作名
/// * `operation` - 試行ごとに呼ばれる処理
///
/// # Errors
///
/// 再試行できないエラー、または `MAX_RETRIES` 回を超えた場合に最後のエラーを返す
pub async fn retry_transient<T, F, Fut>(label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retry_count = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let error_msg = error_chain_to_string(&e);
                if retry_count >= MAX_RETRIES || !is_retryable_error(&error_msg) {
                    return Err(e);
                }
                retry_count += 1;
                let delay = calculate_retry_delay(retry_count);
                warn!(
                    "{} failed (attempt {}/{}), retrying in {}ms: {}",
                    label, retry_count, MAX_RETRIES, delay, error_msg
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
    }
}
