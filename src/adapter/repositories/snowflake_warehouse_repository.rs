//! Snowflake Warehouse Repository Implementation
//!
//! WarehouseRepositoryのSnowflake実装（GCSの外部ステージからCOPY INTO）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::adapter::gcs::bucket::{GcsObject, StagingBucketApi};
use crate::adapter::retry::retry_transient;
use crate::adapter::snowflake::client::SnowflakeStatementApi;
use crate::adapter::snowflake::models::{SessionContext, StatementRequest};
use crate::adapter::snowflake::statements::copy_statement;
use crate::domain::entities::staged_file::StagedFile;
use crate::domain::entities::table_definition::TableDefinition;
use crate::domain::entities::warehouse::Warehouse;
use crate::domain::repositories::warehouse_repository::{LoadResult, WarehouseRepository};
use crate::domain::services::ddl::DdlService;

/// セッションと外部ステージの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnowflakeLoadSettings {
    pub context: SessionContext,
    /// `gcs://{stage_bucket}/` を指す外部ステージ
    pub stage: String,
    pub stage_bucket: String,
    pub stage_prefix: String,
}

/// Snowflakeウェアハウスリポジトリ
pub struct SnowflakeWarehouseRepository {
    api: Arc<dyn SnowflakeStatementApi>,
    bucket: Arc<dyn StagingBucketApi>,
    settings: SnowflakeLoadSettings,
    /// オブジェクト名に使う（実行ごとに一意）
    run_id: String,
}

impl SnowflakeWarehouseRepository {
    pub fn new(
        api: Arc<dyn SnowflakeStatementApi>,
        bucket: Arc<dyn StagingBucketApi>,
        settings: SnowflakeLoadSettings,
    ) -> Self {
        Self {
            api,
            bucket,
            settings,
            run_id: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    async fn copy_into(
        &self,
        definition: &TableDefinition,
        object: &GcsObject,
        file: &StagedFile,
    ) -> Result<usize> {
        let statement = copy_statement(
            &definition.table_name,
            &self.settings.stage,
            &object.name,
            file.delimiter(),
        );
        let response = self
            .api
            .execute(&StatementRequest::new(statement, &self.settings.context))
            .await?;

        Ok(match response.copied_rows() {
            Some(rows) => rows,
            None => {
                warn!("Snowflake did not report loaded rows, assuming the whole file");
                file.record_count()
            }
        })
    }
}

#[async_trait]
impl WarehouseRepository for SnowflakeWarehouseRepository {
    async fn replace_table(&self, definition: &TableDefinition) -> Result<()> {
        let ddl = DdlService::create_table(Warehouse::Snowflake, &definition.table_name, definition)?;

        self.api
            .execute(&StatementRequest::new(ddl, &self.settings.context))
            .await
            .with_context(|| format!("Failed to create table {}", definition.table_name))?;
        info!("Created table {}", definition.table_name);

        Ok(())
    }

    async fn load_file(&self, definition: &TableDefinition, file: &StagedFile) -> Result<LoadResult> {
        let data = tokio::fs::read(file.path())
            .await
            .with_context(|| format!("Failed to read staging file {}", file.path().display()))?;

        let object = GcsObject::for_load(
            &self.settings.stage_bucket,
            &self.settings.stage_prefix,
            &definition.table_name,
            &self.run_id,
        );
        retry_transient("GCS upload", || self.bucket.upload(&object, data.clone())).await?;
        info!("Uploaded {} to {}", file.path().display(), object.uri());

        let copied = self.copy_into(definition, &object, file).await;

        if let Err(e) = self.bucket.delete(&object).await {
            warn!("Failed to remove staged object {}: {:#}", object.uri(), e);
        }

        let loaded = copied.with_context(|| format!("Failed to copy into {}", definition.table_name))?;
        info!("Loaded {} rows into {}", loaded, definition.table_name);

        Ok(LoadResult::new(
            loaded,
            file.record_count().saturating_sub(loaded),
        ))
    }
}
