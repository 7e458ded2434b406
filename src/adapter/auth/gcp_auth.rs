//! GCP Authentication
//!
//! Google Cloud Platform認証機能

use anyhow::{Context, Result};
use google_cloud_bigquery::client::{Client as BigQueryClient, ClientConfig as BigQueryClientConfig};
use google_cloud_storage::client::{Client as StorageClient, ClientConfig as StorageClientConfig};
use log::debug;

/// `~` を展開したキーファイルパスを返す
pub fn expand_key_path(key_path: &str) -> String {
    shellexpand::tilde(key_path).to_string()
}

/// サービスアカウントキーを環境変数に設定する
///
/// `key_path` が空の場合は何もしない（Application Default Credentials）
fn use_service_account_key(key_path: &str) {
    if !key_path.is_empty() {
        let expanded_path = expand_key_path(key_path);
        debug!("Using service account key {}", expanded_path);
        std::env::set_var("GOOGLE_APPLICATION_CREDENTIALS", &expanded_path);
    }
}

/// BigQueryクライアントを作成する
///
/// `key_path` が空の場合はApplication Default Credentialsをそのまま使う
///
/// # Errors
///
/// 認証またはクライアント作成に失敗した場合
pub async fn create_bigquery_client(key_path: &str) -> Result<BigQueryClient> {
    use_service_account_key(key_path);

    let (config, _project_id) = BigQueryClientConfig::new_with_auth()
        .await
        .context("Failed to authenticate with service account")?;

    BigQueryClient::new(config)
        .await
        .context("Failed to create BigQuery client")
}

/// Cloud Storageクライアントを作成する
///
/// # Errors
///
/// 認証に失敗した場合
pub async fn create_storage_client(key_path: &str) -> Result<StorageClient> {
    use_service_account_key(key_path);

    let config = StorageClientConfig::default()
        .with_auth()
        .await
        .context("Failed to authenticate Cloud Storage client")?;

    Ok(StorageClient::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_key_path_with_tilde() {
        #[cfg(unix)]
        let home = std::env::var("HOME").unwrap();
        #[cfg(windows)]
        let home = std::env::var("USERPROFILE").unwrap();

        let result = expand_key_path("~/.config/gcloud/key.json").replace('\\', "/");
        let expected = format!("{}/.config/gcloud/key.json", home).replace('\\', "/");

        assert_eq!(result, expected);
    }

    #[test]
    fn test_expand_key_path_untouched() {
        assert_eq!(expand_key_path("/etc/keys/sa.json"), "/etc/keys/sa.json");
        assert_eq!(expand_key_path("./keys/sa.json"), "./keys/sa.json");
    }
}
