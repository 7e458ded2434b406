//! # Load Table Use Case
//!
//! テーブル再作成とステージングファイルのロードユースケース

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::entities::staged_file::StagedFile;
use crate::domain::entities::table_definition::TableDefinition;
use crate::domain::repositories::warehouse_repository::WarehouseRepository;

/// ロード結果のサマリー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// ロードされた行数
    pub loaded_count: usize,
    /// 失敗した行数
    pub failed_count: usize,
}

impl LoadSummary {
    /// 全行がロードされたかどうか
    pub fn is_complete(&self) -> bool {
        self.failed_count == 0
    }
}

/// テーブルロードユースケース
///
/// テーブルを作り直し、ステージングファイルをまとめてロードする
pub struct LoadTableUseCase<W: WarehouseRepository + ?Sized> {
    warehouse_repository: Arc<W>,
}

impl<W: WarehouseRepository + ?Sized> LoadTableUseCase<W> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `warehouse_repository` - ウェアハウスリポジトリ
    pub fn new(warehouse_repository: Arc<W>) -> Self {
        Self {
            warehouse_repository,
        }
    }

    /// テーブルを作り直してステージングファイルをロードする
    ///
    /// # Errors
    ///
    /// テーブル作成またはロード処理に失敗した場合にエラーを返す
    pub async fn execute(
        &self,
        definition: &TableDefinition,
        file: &StagedFile,
    ) -> Result<LoadSummary> {
        self.warehouse_repository
            .replace_table(definition)
            .await?;
        info!("Replaced table {}", definition.table_name);

        if file.record_count() == 0 {
            warn!("No rows to load into {}", definition.table_name);
            return Ok(LoadSummary {
                loaded_count: 0,
                failed_count: 0,
            });
        }

        let result = self
            .warehouse_repository
            .load_file(definition, file)
            .await?;

        if result.loaded_count + result.failed_count != file.record_count() {
            warn!(
                "Warehouse reported {} rows for {}, staged {}",
                result.loaded_count + result.failed_count,
                definition.table_name,
                file.record_count()
            );
        }

        Ok(LoadSummary {
            loaded_count: result.loaded_count,
            failed_count: result.failed_count,
        })
    }
}
