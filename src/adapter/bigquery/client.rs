//! BigQuery Client Abstractions
//!
//! クライアントの抽象化と実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_bigquery::client::Client;
use google_cloud_bigquery::http::job::get::GetJobRequest;
use google_cloud_bigquery::http::job::Job;
use google_cloud_bigquery::http::table::Table;

#[cfg(test)]
use mockall::automock;

use super::models::{BigQueryTableRef, JobProgress, LoadJobRef};

/// BigQueryのテーブル・ジョブ操作
///
/// テストではモック、本番では実クライアントを使う
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BigQueryApi: Send + Sync {
    /// テーブルが存在するか
    async fn table_exists(&self, table_ref: &BigQueryTableRef) -> Result<bool>;

    async fn delete_table(&self, table_ref: &BigQueryTableRef) -> Result<()>;

    async fn create_table(&self, table: &Table) -> Result<()>;

    /// ジョブを投入する
    async fn insert_job(&self, job: &Job) -> Result<JobProgress>;

    /// ジョブの現在の状態
    async fn get_job(&self, job_ref: &LoadJobRef) -> Result<JobProgress>;
}

/// 404を「存在しない」として扱うためのエラー判定
fn is_not_found(error_msg: &str) -> bool {
    error_msg.contains("404") || error_msg.contains("Not found") || error_msg.contains("not found")
}

/// Clientを所有するBigQueryクライアント
pub struct OwnedBigQueryClient {
    client: Client,
}

impl OwnedBigQueryClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BigQueryApi for OwnedBigQueryClient {
    async fn table_exists(&self, table_ref: &BigQueryTableRef) -> Result<bool> {
        match self
            .client
            .table()
            .get(
                &table_ref.project_id,
                &table_ref.dataset_id,
                &table_ref.table_id,
            )
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e.to_string()) => Ok(false),
            Err(e) => Err(e).context("BigQuery table lookup failed"),
        }
    }

    async fn delete_table(&self, table_ref: &BigQueryTableRef) -> Result<()> {
        self.client
            .table()
            .delete(
                &table_ref.project_id,
                &table_ref.dataset_id,
                &table_ref.table_id,
            )
            .await
            .context("BigQuery table delete failed")
    }

    async fn create_table(&self, table: &Table) -> Result<()> {
        self.client
            .table()
            .create(table)
            .await
            .map(|_| ())
            .context("BigQuery table create failed")
    }

    async fn insert_job(&self, job: &Job) -> Result<JobProgress> {
        self.client
            .job()
            .create(job)
            .await
            .map(|created| JobProgress::from_job(&created))
            .context("BigQuery job insert failed")
    }

    async fn get_job(&self, job_ref: &LoadJobRef) -> Result<JobProgress> {
        let request = GetJobRequest {
            location: job_ref.location.clone(),
        };
        self.client
            .job()
            .get(&job_ref.project_id, &job_ref.job_id, &request)
            .await
            .map(|job| JobProgress::from_job(&job))
            .context("BigQuery job lookup failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found("HTTP status client error (404 Not Found)"));
        assert!(is_not_found("Not found: Table proj:ds.ITEMS"));
        assert!(!is_not_found("403 Access Denied"));
    }
}
