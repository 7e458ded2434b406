//! GCS Staging Bucket
//!
//! ロード元になるステージングファイルの置き場所

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_storage::client::Client;
use google_cloud_storage::http::objects::delete::DeleteObjectRequest;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};

#[cfg(test)]
use mockall::automock;

/// ステージングバケット上のオブジェクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcsObject {
    pub bucket: String,
    pub name: String,
}

impl GcsObject {
    /// ロード用のオブジェクト名 `{prefix}{table}_{run_id}.csv` を作る
    ///
    /// `table` が修飾名の場合は最後の要素だけを使う
    pub fn for_load(bucket: &str, prefix: &str, table: &str, run_id: &str) -> Self {
        let table = table.rsplit('.').next().unwrap_or(table);
        Self {
            bucket: bucket.to_string(),
            name: format!("{}{}_{}.csv", prefix, table, run_id),
        }
    }

    pub fn uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.name)
    }
}

/// ステージングバケットへのアップロードと削除
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StagingBucketApi: Send + Sync {
    async fn upload(&self, object: &GcsObject, data: Vec<u8>) -> Result<()>;

    async fn delete(&self, object: &GcsObject) -> Result<()>;
}

/// Cloud Storageクライアント
pub struct GcsBucketClient {
    client: Client,
}

impl GcsBucketClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StagingBucketApi for GcsBucketClient {
    async fn upload(&self, object: &GcsObject, data: Vec<u8>) -> Result<()> {
        let request = UploadObjectRequest {
            bucket: object.bucket.clone(),
            ..Default::default()
        };
        let mut media = Media::new(object.name.clone());
        media.content_type = "text/csv".into();

        self.client
            .upload_object(&request, data, &UploadType::Simple(media))
            .await
            .map(|_| ())
            .with_context(|| format!("Failed to upload {}", object.uri()))
    }

    async fn delete(&self, object: &GcsObject) -> Result<()> {
        let request = DeleteObjectRequest {
            bucket: object.bucket.clone(),
            object: object.name.clone(),
            ..Default::default()
        };

        self.client
            .delete_object(&request)
            .await
            .with_context(|| format!("Failed to delete {}", object.uri()))
    }
}
