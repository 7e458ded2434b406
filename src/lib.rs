//! # sheetload
//!
//! スプレッドシートを読み込み、列の型を確認・変換して BigQuery / Snowflake のテーブルにロードするツール
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: セル・列・型推論・型変換・DDLのルール（外部依存なし）
//! - **Application層**: 読み込み・型確認・ステージング・ロードのユースケース
//! - **Adapter層**: 外部システムとの統合（calamine, csv, BigQuery, Snowflake SQL API, 端末）
//! - **Driver層**: CLI、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時に外部サービス依存コードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
