//! # Warehouse Repository Trait
//!
//! ウェアハウスへのテーブル作成とファイルロードを抽象化

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::staged_file::StagedFile;
use crate::domain::entities::table_definition::TableDefinition;

/// ロード結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    /// ロードされた行数
    pub loaded_count: usize,
    /// 失敗した行数
    pub failed_count: usize,
}

impl LoadResult {
    /// 新しいロード結果を作成
    pub fn new(loaded_count: usize, failed_count: usize) -> Self {
        Self {
            loaded_count,
            failed_count,
        }
    }

    /// ロードが完全に成功したかチェックします。
    ///
    /// # 例
    ///
    /// ```
    /// use sheetload::domain::repositories::warehouse_repository::LoadResult;
    ///
    /// assert!(LoadResult::new(10, 0).is_success());
    /// assert!(!LoadResult::new(8, 2).is_success());
    /// ```
    pub fn is_success(&self) -> bool {
        self.failed_count == 0
    }
}

/// ウェアハウスリポジトリ
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    /// テーブルを作り直す（既存テーブルは破棄される）
    ///
    /// # Errors
    ///
    /// テーブルの削除・作成に失敗した場合にエラーを返す
    async fn replace_table(&self, definition: &TableDefinition) -> Result<()>;

    /// ステージングファイルをテーブルにロードする
    ///
    /// ファイルをウェアハウス側にアップロードし、ロード処理（LOAD/COPY）を実行する
    ///
    /// # Errors
    ///
    /// アップロードまたはロード処理に失敗した場合にエラーを返す
    async fn load_file(&self, definition: &TableDefinition, file: &StagedFile)
        -> Result<LoadResult>;
}
