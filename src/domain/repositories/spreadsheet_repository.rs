//! # Spreadsheet Repository Trait
//!
//! スプレッドシートの読み込みを抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::cell::CellValue;

/// 読み込んだままのシート
///
/// 先頭行をヘッダー、残りをデータ行とする
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    /// ヘッダー行（正規化前）
    pub headers: Vec<String>,
    /// データ行
    pub rows: Vec<Vec<CellValue>>,
}

/// スプレッドシートリポジトリ
#[async_trait]
pub trait SpreadsheetRepository: Send + Sync {
    /// シートを読み込む
    ///
    /// # Arguments
    ///
    /// * `path` - スプレッドシートファイルのパス
    /// * `sheet` - シート名（`None` の場合は先頭シート）
    ///
    /// # Errors
    ///
    /// ファイルが開けない、またはシートが見つからない場合にエラーを返す
    async fn read_sheet(&self, path: &Path, sheet: Option<&str>) -> Result<RawSheet>;
}
