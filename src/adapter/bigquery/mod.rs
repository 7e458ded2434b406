//! BigQuery Adapter Modules
//!
//! BigQueryへのテーブル作成とGCS経由のロードジョブ

pub mod client;
pub mod load_job;
pub mod models;
