//! # Domain Errors
//!
//! ドメイン層のエラー定義

use thiserror::Error;

/// ドメインエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetLoadError {
    #[error("the sheet has no header row")]
    NoColumns,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("type '{keyword}' is not acceptable for column '{column}' (acceptable: {acceptable})")]
    UnacceptableType {
        column: String,
        keyword: String,
        acceptable: String,
    },

    #[error("invalid type override '{0}', expected COLUMN=TYPE")]
    InvalidOverrideSyntax(String),

    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    #[error("cannot create table '{0}' without columns")]
    EmptyTableDefinition(String),
}
