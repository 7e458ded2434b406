//! # Driver Layer (Presentation)
//!
//! CLIやその他の外部インターフェースを提供
//!
//! ## 特徴
//!
//! - Use Caseを呼び出してロードの流れを起動
//! - 依存性注入（DI）を行い、全てを組み立てる
//! - オペレーターとのインターフェース
//!
//! ## 構成要素
//!
//! - **cli**: CLI引数のパース
//! - **connector**: 設定からウェアハウスリポジトリを組み立てる
//! - **workflow**: ワークフロー全体のオーケストレーション

pub mod cli;
pub mod connector;
pub mod workflow;

pub use cli::Args;
pub use connector::{CloudWarehouseConnector, WarehouseConnector};
pub use workflow::SheetLoadWorkflow;
