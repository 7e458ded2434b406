//! # Domain Services
//!
//! エンティティにまたがるビジネスルール
//!
//! - **column_naming**: ヘッダーの正規化
//! - **type_inference**: 列の型推論
//! - **cleaning**: 文字列セルの空白整理
//! - **type_override**: 型キーワードの解釈
//! - **coercion**: 確定型への値変換
//! - **ddl**: CREATE文の生成

pub mod cleaning;
pub mod coercion;
pub mod column_naming;
pub mod ddl;
pub mod type_inference;
pub mod type_override;
