//! # Type Override Service
//!
//! オペレーターが指定した型キーワードの解釈

use crate::domain::entities::column::ColumnType;
use crate::domain::entities::warehouse::Warehouse;
use crate::domain::error::SheetLoadError;
use crate::domain::services::column_naming::ColumnNamingService;

/// `COLUMN=TYPE` 形式の事前指定オーバーライド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetOverride {
    /// 正規化済みの列名
    pub column: String,
    /// 型キーワード（未検証）
    pub keyword: String,
}

/// 型オーバーライドサービス
pub struct TypeOverrideService;

impl TypeOverrideService {
    /// キーワードをウェアハウス型に変換する
    ///
    /// ウェアハウスが受け付けないキーワードは `None`（デフォルト型のまま）
    pub fn parse(input: &str, warehouse: Warehouse) -> Option<ColumnType> {
        ColumnType::from_keyword(input).filter(|t| warehouse.acceptable_types().contains(t))
    }

    /// `COLUMN=TYPE` を分解する
    ///
    /// 列名はヘッダーと同じ規則で正規化する
    pub fn parse_preset(entry: &str) -> Result<PresetOverride, SheetLoadError> {
        let (column, keyword) = entry
            .split_once('=')
            .ok_or_else(|| SheetLoadError::InvalidOverrideSyntax(entry.to_string()))?;

        let invalid = || SheetLoadError::InvalidOverrideSyntax(entry.to_string());
        if keyword.trim().is_empty() {
            return Err(invalid());
        }
        // 列番号による代替名にはしない
        let column = ColumnNamingService::identifier(column).ok_or_else(invalid)?;

        Ok(PresetOverride {
            column,
            keyword: keyword.trim().to_string(),
        })
    }

    /// 事前指定オーバーライドの型を検証して返す
    pub fn resolve_preset(
        preset: &PresetOverride,
        warehouse: Warehouse,
    ) -> Result<ColumnType, SheetLoadError> {
        Self::parse(&preset.keyword, warehouse).ok_or_else(|| SheetLoadError::UnacceptableType {
            column: preset.column.clone(),
            keyword: preset.keyword.clone(),
            acceptable: warehouse.acceptable_keywords(),
        })
    }
}
