//! # Domain Layer
//!
//! このモジュールはビジネスの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - 外部依存を持たない（Rust標準ライブラリと最小限の依存のみ）
//! - フレームワークに依存しない
//! - スプレッドシートの形式やウェアハウスのAPIについて何も知らない
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（SheetData, Column, StagedFileなど）
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（型推論・型変換・DDL生成）
//! - **error**: ドメインエラー

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
