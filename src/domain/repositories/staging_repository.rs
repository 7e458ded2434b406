//! # Staging Repository Trait
//!
//! ロード前の区切りファイル出力を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::sheet_data::SheetData;
use crate::domain::entities::staged_file::StagedFile;

/// ステージングリポジトリ
#[async_trait]
pub trait StagingRepository: Send + Sync {
    /// ヘッダー付きの区切りファイルを書き出す
    ///
    /// # Arguments
    ///
    /// * `path` - 出力先
    /// * `data` - 変換済みの表データ
    /// * `delimiter` - 区切り文字
    ///
    /// # Returns
    ///
    /// 書き出したファイル（データ行数はヘッダーを除く）
    async fn write_delimited(
        &self,
        path: &Path,
        data: &SheetData,
        delimiter: u8,
    ) -> Result<StagedFile>;
}
