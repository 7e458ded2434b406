//! BigQuery Load Job Runner
//!
//! ロードジョブの投入と完了待ち

use anyhow::{anyhow, bail, Result};
use google_cloud_bigquery::http::job::Job;
use log::{debug, info};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::client::BigQueryApi;
use super::models::{JobProgress, LoadJobRef};
use crate::adapter::retry::retry_transient;

/// ジョブ状態の確認間隔
pub const JOB_POLL_INTERVAL_MS: u64 = 1000;
/// 完了を待つ上限
pub const JOB_TIMEOUT_SECS: u64 = 1800;

/// 同じジョブIDで再送したときに返るエラーか
fn is_already_exists(error_msg: &str) -> bool {
    error_msg.contains("409") || error_msg.contains("Already Exists")
}

/// ジョブを投入して完了まで待つ
///
/// 一時的なエラーは再試行する。再送で409になった場合は最初の投入が通っているとみなす
///
/// # Errors
///
/// 投入・状態確認に失敗した場合、ジョブがエラーで終わった場合、タイムアウトした場合
pub async fn run_load_job(api: &dyn BigQueryApi, job: &Job, job_ref: &LoadJobRef) -> Result<()> {
    let submitted = retry_transient("BigQuery load job insert", || api.insert_job(job)).await;
    let mut progress = match submitted {
        Ok(progress) => progress,
        Err(e) if is_already_exists(&format!("{:#}", e)) => {
            debug!("Load job {} already exists, waiting for it", job_ref.job_id);
            JobProgress::default()
        }
        Err(e) => return Err(e),
    };
    info!("Submitted load job {}", job_ref.job_id);

    let deadline = Instant::now() + Duration::from_secs(JOB_TIMEOUT_SECS);
    while !progress.done {
        if Instant::now() >= deadline {
            bail!(
                "Load job {} did not finish within {} seconds",
                job_ref.job_id,
                JOB_TIMEOUT_SECS
            );
        }
        sleep(Duration::from_millis(JOB_POLL_INTERVAL_MS)).await;
        progress = retry_transient("BigQuery load job lookup", || api.get_job(job_ref)).await?;
    }

    match progress.error {
        Some(error) => Err(anyhow!("Load job {} failed: {}", job_ref.job_id, error)),
        None => Ok(()),
    }
}
