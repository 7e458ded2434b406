//! Adapter Layer
//!
//! 外部システム（スプレッドシート, ファイルシステム, GCS, BigQuery, Snowflake, 端末）との統合

pub mod auth;
pub mod bigquery;
pub mod config;
pub mod console;
pub mod gcs;
pub mod repositories;
pub mod retry;
pub mod snowflake;
