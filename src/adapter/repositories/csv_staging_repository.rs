//! CSV Staging Repository Implementation
//!
//! StagingRepositoryのcsvクレート実装

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::sheet_data::SheetData;
use crate::domain::entities::staged_file::StagedFile;
use crate::domain::repositories::staging_repository::StagingRepository;

/// 区切りファイルに書き出すステージングリポジトリ
pub struct CsvStagingRepository;

impl CsvStagingRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// 区切りファイルを書き出す（同期処理）
    fn write_sync(path: &Path, data: &SheetData, delimiter: u8) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create staging directory")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)
            .with_context(|| format!("Failed to create staging file {}", path.display()))?;

        let header: Vec<&str> = data.columns().iter().map(|c| c.name.as_str()).collect();
        writer
            .write_record(&header)
            .context("Failed to write staging header")?;

        let mut written = 0;
        for row in data.rows() {
            writer
                .write_record(row.iter().map(|cell| cell.to_text()))
                .context("Failed to write staging row")?;
            written += 1;
        }

        writer.flush().context("Failed to flush staging file")?;
        debug!("Wrote {} rows to {}", written, path.display());

        Ok(written)
    }
}

#[async_trait]
impl StagingRepository for CsvStagingRepository {
    async fn write_delimited(
        &self,
        path: &Path,
        data: &SheetData,
        delimiter: u8,
    ) -> Result<StagedFile> {
        let path: PathBuf = path.to_path_buf();
        let data = data.clone();
        tokio::task::spawn_blocking(move || {
            let written = Self::write_sync(&path, &data, delimiter)?;
            Ok::<_, anyhow::Error>(StagedFile::new(path, delimiter, written))
        })
        .await
        .map_err(|e| anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

impl Default for CsvStagingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::domain::entities::cell::CellValue;
    use crate::domain::entities::column::{Column, SourceType};

    #[tokio::test]
    async fn test_write_pipe_delimited() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staging").join("out.csv");
        let data = SheetData::new(
            vec![
                Column::new("ID", SourceType::Int64),
                Column::new("NAME", SourceType::Object),
                Column::new("SCORE", SourceType::Float64),
            ],
            vec![
                vec![
                    CellValue::Int(1),
                    CellValue::String("Ada".to_string()),
                    CellValue::Float(9.0),
                ],
                vec![
                    CellValue::Int(2),
                    CellValue::String("a|b".to_string()),
                    CellValue::Null,
                ],
            ],
        );

        let repo = CsvStagingRepository::new();
        let staged = repo.write_delimited(&path, &data, b'|').await.unwrap();

        assert_eq!(staged.record_count(), 2);
        assert_eq!(staged.path(), path.as_path());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "ID|NAME|SCORE\n1|Ada|9.0\n2|\"a|b\"|\n");
    }
}
