//! Snowflake Adapter Modules
//!
//! SQL APIによるテーブル作成と外部ステージからのCOPY INTO

pub mod client;
pub mod models;
pub mod statements;
