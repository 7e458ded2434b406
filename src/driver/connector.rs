//! Warehouse Connector
//!
//! 設定からウェアハウスリポジトリを組み立てる

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::adapter::auth::{create_bigquery_client, create_storage_client};
use crate::adapter::bigquery::client::OwnedBigQueryClient;
use crate::adapter::config::Config;
use crate::adapter::gcs::bucket::GcsBucketClient;
use crate::adapter::repositories::bigquery_warehouse_repository::BigQueryWarehouseRepository;
use crate::adapter::repositories::snowflake_warehouse_repository::SnowflakeWarehouseRepository;
use crate::adapter::snowflake::client::SqlApiClient;
use crate::domain::entities::warehouse::Warehouse;
use crate::domain::repositories::warehouse_repository::WarehouseRepository;

/// ロード先ごとのリポジトリを作る
///
/// テストでは接続せずにモックのリポジトリを返す実装を差し込む
#[async_trait]
pub trait WarehouseConnector: Send + Sync {
    /// # Errors
    ///
    /// 設定が足りない場合、または認証に失敗した場合
    async fn connect(
        &self,
        warehouse: Warehouse,
        config: &Config,
    ) -> Result<Arc<dyn WarehouseRepository>>;
}

/// BigQuery / Snowflake に実際に接続する
pub struct CloudWarehouseConnector;

#[async_trait]
impl WarehouseConnector for CloudWarehouseConnector {
    async fn connect(
        &self,
        warehouse: Warehouse,
        config: &Config,
    ) -> Result<Arc<dyn WarehouseRepository>> {
        match warehouse {
            Warehouse::BigQuery => {
                let bq = config.bigquery()?;
                let settings = bq.load_settings()?;
                let client = create_bigquery_client(&bq.service_account_key_path).await?;
                let storage = create_storage_client(&bq.service_account_key_path).await?;
                info!(
                    "Using BigQuery project {} dataset {} (staging gs://{}/{})",
                    settings.project_id,
                    settings.dataset,
                    settings.staging_bucket,
                    settings.staging_prefix
                );

                Ok(Arc::new(BigQueryWarehouseRepository::new(
                    Arc::new(OwnedBigQueryClient::new(client)),
                    Arc::new(GcsBucketClient::new(storage)),
                    settings,
                )))
            }
            Warehouse::Snowflake => {
                let sf = config.snowflake()?;
                let settings = sf.load_settings()?;
                let client = SqlApiClient::new(&sf.connection()?)?;
                let storage = create_storage_client(&sf.service_account_key_path).await?;
                info!(
                    "Using Snowflake account {} (stage {} on gs://{}/{})",
                    sf.account, settings.stage, settings.stage_bucket, settings.stage_prefix
                );

                Ok(Arc::new(SnowflakeWarehouseRepository::new(
                    Arc::new(client),
                    Arc::new(GcsBucketClient::new(storage)),
                    settings,
                )))
            }
        }
    }
}
