//! Repository Implementations
//!
//! Domain層のRepositoryトレイトの実装

pub mod bigquery_warehouse_repository;
pub mod calamine_spreadsheet_repository;
pub mod csv_staging_repository;
pub mod snowflake_warehouse_repository;
