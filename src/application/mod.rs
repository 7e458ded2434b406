//! # Application Layer
//!
//! シート読み込みからロードまでのユースケース
//!
//! ## 特徴
//!
//! - Domain層のサービスを組み合わせてロードの各段階を実現
//! - Repository trait と OperatorConsole trait に依存（実装には依存しない）
//! - スプレッドシート形式やウェアハウスAPIの詳細は知らない
//!
//! ## 構成要素
//!
//! - **dto**: ロード設定
//! - **use_cases**: 読み込み・型確認・ステージング・ロード

pub mod dto;
pub mod use_cases;
