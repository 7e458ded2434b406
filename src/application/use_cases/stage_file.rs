//! # Stage File Use Case
//!
//! ロード前の区切りファイル出力ユースケース

use anyhow::{bail, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::application::dto::load_config::LoadConfig;
use crate::domain::entities::sheet_data::SheetData;
use crate::domain::entities::staged_file::StagedFile;
use crate::domain::repositories::staging_repository::StagingRepository;

/// ステージングファイル出力ユースケース
pub struct StageFileUseCase<St: StagingRepository> {
    staging_repository: Arc<St>,
}

impl<St: StagingRepository> StageFileUseCase<St> {
    /// 新しいユースケースを作成
    pub fn new(staging_repository: Arc<St>) -> Self {
        Self { staging_repository }
    }

    /// 変換済みデータを区切りファイルに書き出す
    ///
    /// # Returns
    ///
    /// 書き出したステージングファイル
    ///
    /// # Errors
    ///
    /// 書き出しに失敗した場合、または書き出した行数が表の行数と一致しない場合
    pub async fn execute(
        &self,
        data: &SheetData,
        path: &Path,
        config: &LoadConfig,
    ) -> Result<StagedFile> {
        let staged = self
            .staging_repository
            .write_delimited(path, data, config.field_delimiter)
            .await?;

        if staged.record_count() != data.row_count() {
            bail!(
                "Staging file {} has {} rows, expected {}",
                path.display(),
                staged.record_count(),
                data.row_count()
            );
        }

        info!("Staged {} rows to {}", staged.record_count(), path.display());
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::entities::cell::CellValue;
    use crate::domain::entities::column::{Column, SourceType};
    use crate::domain::entities::warehouse::Warehouse;

    struct MockStagingRepository {
        rows_to_report: Option<usize>,
        delimiters: Mutex<Vec<u8>>,
    }

    #[async_trait]
    impl StagingRepository for MockStagingRepository {
        async fn write_delimited(
            &self,
            path: &Path,
            data: &SheetData,
            delimiter: u8,
        ) -> Result<StagedFile> {
            self.delimiters.lock().unwrap().push(delimiter);
            Ok(StagedFile::new(
                path,
                delimiter,
                self.rows_to_report.unwrap_or(data.row_count()),
            ))
        }
    }

    fn create_test_data() -> SheetData {
        SheetData::new(
            vec![Column::new("ID", SourceType::Int64)],
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(2)]],
        )
    }

    #[tokio::test]
    async fn test_stage_file_uses_configured_delimiter() {
        let repo = Arc::new(MockStagingRepository {
            rows_to_report: None,
            delimiters: Mutex::new(Vec::new()),
        });
        let use_case = StageFileUseCase::new(repo.clone());
        let config = LoadConfig::new(Warehouse::Snowflake, "T".to_string());

        let staged = use_case
            .execute(&create_test_data(), Path::new("out.csv"), &config)
            .await
            .unwrap();

        assert_eq!(staged.record_count(), 2);
        assert_eq!(staged.path(), Path::new("out.csv"));
        assert_eq!(*repo.delimiters.lock().unwrap(), vec![b'|']);
    }

    #[tokio::test]
    async fn test_stage_file_row_count_mismatch() {
        let repo = Arc::new(MockStagingRepository {
            rows_to_report: Some(1),
            delimiters: Mutex::new(Vec::new()),
        });
        let use_case = StageFileUseCase::new(repo);
        let config = LoadConfig::new(Warehouse::Snowflake, "T".to_string());

        let result = use_case
            .execute(&create_test_data(), Path::new("out.csv"), &config)
            .await;

        assert!(result.is_err());
    }
}
