//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **ReadSheetUseCase**: シートの読み込みと型推論
//! - **ResolveTypesUseCase**: 列型の確認とオーバーライド
//! - **StageFileUseCase**: 区切りファイルの出力
//! - **LoadTableUseCase**: テーブル再作成とロード

pub mod load_table;
pub mod read_sheet;
pub mod resolve_types;
pub mod stage_file;
