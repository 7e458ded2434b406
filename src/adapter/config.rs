//! Configuration
//!
//! JSON設定ファイルの読み込み

use anyhow::{anyhow, bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::adapter::repositories::bigquery_warehouse_repository::BigQueryLoadSettings;
use crate::adapter::repositories::snowflake_warehouse_repository::SnowflakeLoadSettings;
use crate::adapter::snowflake::client::SnowflakeConnection;
use crate::adapter::snowflake::models::SessionContext;

fn default_field_delimiter() -> String {
    "|".to_string()
}

fn default_staging_file() -> String {
    "sheetload_tempFile.csv".to_string()
}

fn default_staging_prefix() -> String {
    "sheetload/".to_string()
}

fn default_token_env() -> String {
    "SNOWFLAKE_TOKEN".to_string()
}

fn default_token_type() -> String {
    "OAUTH".to_string()
}

fn default_statement_timeout_secs() -> u64 {
    600
}

/// 設定全体
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// ステージングファイルの区切り文字（1文字）
    #[serde(default = "default_field_delimiter")]
    pub field_delimiter: String,
    #[serde(default = "default_staging_file")]
    pub staging_file: String,
    #[serde(default)]
    pub bigquery: Option<BigQueryConfig>,
    #[serde(default)]
    pub snowflake: Option<SnowflakeConfig>,
}

/// BigQueryの接続先
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BigQueryConfig {
    pub project_id: String,
    pub dataset: String,
    /// ロードジョブのロケーション
    #[serde(default)]
    pub location: Option<String>,
    /// 空の場合はApplication Default Credentials
    #[serde(default)]
    pub service_account_key_path: String,
    /// ステージングファイルを置くGCSバケット（ロードに必須）
    #[serde(default)]
    pub staging_bucket: Option<String>,
    #[serde(default = "default_staging_prefix")]
    pub staging_prefix: String,
}

/// Snowflakeの接続先
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnowflakeConfig {
    pub account: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// 直接指定したトークン（未指定なら `token_env` の環境変数）
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_statement_timeout_secs")]
    pub statement_timeout_secs: u64,
    /// `gcs://{stage_bucket}/` を指す外部ステージ（ロードに必須）
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub stage_bucket: Option<String>,
    #[serde(default = "default_staging_prefix")]
    pub stage_prefix: String,
    /// GCSへのアップロードに使うキー（空の場合はApplication Default Credentials）
    #[serde(default)]
    pub service_account_key_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_delimiter: default_field_delimiter(),
            staging_file: default_staging_file(),
            bigquery: None,
            snowflake: None,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込む
    ///
    /// ファイルがない場合は既定値を使う（ドライランは接続先なしで動く）
    ///
    /// # Errors
    ///
    /// 読み込みまたはJSONのパースに失敗した場合
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        if !Path::new(&expanded).exists() {
            warn!("Config file {} not found, using defaults", expanded);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&expanded)
            .with_context(|| format!("Failed to read config file {}", expanded))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", expanded))?;
        Ok(config)
    }

    /// 区切り文字をバイトとして返す
    ///
    /// # Errors
    ///
    /// ASCII1文字でない場合
    pub fn field_delimiter_byte(&self) -> Result<u8> {
        match self.field_delimiter.as_bytes() {
            [b] if b.is_ascii() && *b != b'\n' && *b != b'"' => Ok(*b),
            _ => bail!(
                "field_delimiter must be a single ASCII character, got {:?}",
                self.field_delimiter
            ),
        }
    }

    pub fn bigquery(&self) -> Result<&BigQueryConfig> {
        self.bigquery
            .as_ref()
            .ok_or_else(|| anyhow!("Config file has no \"bigquery\" section"))
    }

    pub fn snowflake(&self) -> Result<&SnowflakeConfig> {
        self.snowflake
            .as_ref()
            .ok_or_else(|| anyhow!("Config file has no \"snowflake\" section"))
    }
}

impl BigQueryConfig {
    /// ロードジョブの設定
    ///
    /// # Errors
    ///
    /// `staging_bucket` が未設定の場合
    pub fn load_settings(&self) -> Result<BigQueryLoadSettings> {
        let staging_bucket = self
            .staging_bucket
            .clone()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| anyhow!("BigQuery loads need \"staging_bucket\" in the config file"))?;

        Ok(BigQueryLoadSettings {
            project_id: self.project_id.clone(),
            dataset: self.dataset.clone(),
            location: self.location.clone(),
            staging_bucket,
            staging_prefix: self.staging_prefix.clone(),
        })
    }
}

impl SnowflakeConfig {
    /// 認証トークンを解決する
    ///
    /// # Errors
    ///
    /// 設定にも環境変数にもトークンがない場合
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_empty()) {
            return Ok(token.clone());
        }
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "Snowflake token not configured (set \"token\" or the {} environment variable)",
                    self.token_env
                )
            })
    }

    pub fn connection(&self) -> Result<SnowflakeConnection> {
        Ok(SnowflakeConnection {
            account: self.account.clone(),
            token: self.resolve_token()?,
            token_type: self.token_type.clone(),
            statement_timeout: Duration::from_secs(self.statement_timeout_secs),
        })
    }

    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            database: self.database.clone(),
            schema: self.schema.clone(),
            warehouse: self.warehouse.clone(),
            role: self.role.clone(),
            timeout_secs: Some(self.statement_timeout_secs),
        }
    }

    /// 外部ステージ経由のロード設定
    ///
    /// # Errors
    ///
    /// `stage` または `stage_bucket` が未設定の場合
    pub fn load_settings(&self) -> Result<SnowflakeLoadSettings> {
        let required = |value: &Option<String>, key: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("Snowflake loads need \"{}\" in the config file", key))
        };

        Ok(SnowflakeLoadSettings {
            context: self.session_context(),
            stage: required(&self.stage, "stage")?,
            stage_bucket: required(&self.stage_bucket, "stage_bucket")?,
            stage_prefix: self.stage_prefix.clone(),
        })
    }
}
