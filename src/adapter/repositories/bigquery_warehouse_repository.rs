//! BigQuery Warehouse Repository Implementation
//!
//! WarehouseRepositoryのBigQuery実装（GCS経由のロードジョブ）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::adapter::bigquery::client::BigQueryApi;
use crate::adapter::bigquery::load_job::run_load_job;
use crate::adapter::bigquery::models::{build_load_job, build_table, BigQueryTableRef, LoadJobRef};
use crate::adapter::gcs::bucket::{GcsObject, StagingBucketApi};
use crate::adapter::retry::retry_transient;
use crate::domain::entities::staged_file::StagedFile;
use crate::domain::entities::table_definition::TableDefinition;
use crate::domain::repositories::warehouse_repository::{LoadResult, WarehouseRepository};

/// ロード先とステージングバケットの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigQueryLoadSettings {
    /// テーブル名で省略されたときのプロジェクト
    pub project_id: String,
    /// テーブル名で省略されたときのデータセット
    pub dataset: String,
    /// ジョブのロケーション（`None` ならBigQueryが決める）
    pub location: Option<String>,
    pub staging_bucket: String,
    pub staging_prefix: String,
}

/// BigQueryウェアハウスリポジトリ
pub struct BigQueryWarehouseRepository {
    api: Arc<dyn BigQueryApi>,
    bucket: Arc<dyn StagingBucketApi>,
    settings: BigQueryLoadSettings,
    /// ジョブIDとオブジェクト名に使う（実行ごとに一意）
    run_id: String,
}

impl BigQueryWarehouseRepository {
    /// 新しいリポジトリを作成
    pub fn new(
        api: Arc<dyn BigQueryApi>,
        bucket: Arc<dyn StagingBucketApi>,
        settings: BigQueryLoadSettings,
    ) -> Self {
        Self {
            api,
            bucket,
            settings,
            run_id: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    /// テーブル名を `project.dataset.table` に解決
    pub fn table_ref(&self, table_name: &str) -> Result<BigQueryTableRef> {
        BigQueryTableRef::resolve(&self.settings.project_id, &self.settings.dataset, table_name)
    }
}

#[async_trait]
impl WarehouseRepository for BigQueryWarehouseRepository {
    async fn replace_table(&self, definition: &TableDefinition) -> Result<()> {
        let table_ref = self.table_ref(&definition.table_name)?;

        if self.api.table_exists(&table_ref).await? {
            self.api.delete_table(&table_ref).await?;
            info!("Deleted existing table {}", table_ref.qualified_name());
        }

        self.api
            .create_table(&build_table(&table_ref, definition))
            .await
            .with_context(|| format!("Failed to create table {}", table_ref.qualified_name()))?;
        info!("Created table {}", table_ref.qualified_name());

        Ok(())
    }

    async fn load_file(&self, definition: &TableDefinition, file: &StagedFile) -> Result<LoadResult> {
        let table_ref = self.table_ref(&definition.table_name)?;
        let data = tokio::fs::read(file.path())
            .await
            .with_context(|| format!("Failed to read staging file {}", file.path().display()))?;

        let object = GcsObject::for_load(
            &self.settings.staging_bucket,
            &self.settings.staging_prefix,
            &table_ref.table_id,
            &self.run_id,
        );
        retry_transient("GCS upload", || self.bucket.upload(&object, data.clone())).await?;
        info!("Uploaded {} to {}", file.path().display(), object.uri());

        let job_ref = LoadJobRef::new(
            &table_ref.project_id,
            &self.run_id,
            self.settings.location.clone(),
        );
        let job = build_load_job(&job_ref, &table_ref, definition, &object, file);
        let loaded = run_load_job(self.api.as_ref(), &job, &job_ref).await;

        if let Err(e) = self.bucket.delete(&object).await {
            warn!("Failed to remove staged object {}: {:#}", object.uri(), e);
        }

        loaded.with_context(|| format!("Failed to load {}", table_ref.qualified_name()))?;
        info!(
            "Loaded {} rows into {}",
            file.record_count(),
            table_ref.qualified_name()
        );

        Ok(LoadResult::new(file.record_count(), 0))
    }
}
