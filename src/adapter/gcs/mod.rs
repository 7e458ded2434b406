//! Cloud Storage Adapter
//!
//! ステージングファイルを置くGCSバケット（BigQuery / Snowflake共通）

pub mod bucket;
