//! # Read Sheet Use Case
//!
//! スプレッドシート読み込みと型推論ユースケース

use anyhow::Result;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::column::{Column, SourceType};
use crate::domain::entities::sheet_data::SheetData;
use crate::domain::error::SheetLoadError;
use crate::domain::repositories::spreadsheet_repository::SpreadsheetRepository;
use crate::domain::services::cleaning::CleaningService;
use crate::domain::services::column_naming::ColumnNamingService;
use crate::domain::services::type_inference::TypeInferenceService;

/// シート読み込みユースケース
///
/// シートを読み込み、ヘッダーを正規化して列の型を推論する
pub struct ReadSheetUseCase<S: SpreadsheetRepository> {
    spreadsheet_repository: Arc<S>,
}

impl<S: SpreadsheetRepository> ReadSheetUseCase<S> {
    /// 新しいユースケースを作成
    pub fn new(spreadsheet_repository: Arc<S>) -> Self {
        Self {
            spreadsheet_repository,
        }
    }

    /// シートを読み込んで表データにする
    ///
    /// # Arguments
    ///
    /// * `path` - スプレッドシートのパス
    /// * `sheet` - シート名（`None` の場合は先頭シート）
    ///
    /// # Errors
    ///
    /// 読み込みに失敗した場合、またはヘッダー行がない場合にエラーを返す
    pub async fn execute(&self, path: &Path, sheet: Option<&str>) -> Result<SheetData> {
        let raw = self.spreadsheet_repository.read_sheet(path, sheet).await?;

        if raw.headers.is_empty() {
            return Err(SheetLoadError::NoColumns.into());
        }

        let names = ColumnNamingService::normalize_all(&raw.headers);
        for (raw_name, name) in raw.headers.iter().zip(&names) {
            if raw_name != name {
                debug!("Renamed column '{}' -> '{}'", raw_name, name);
            }
        }

        // 推論前に行の長さを揃える
        let placeholder: Vec<Column> = names
            .iter()
            .map(|n| Column::new(n.clone(), SourceType::Object))
            .collect();
        let padded = SheetData::new(placeholder, raw.rows);

        let columns: Vec<Column> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, TypeInferenceService::infer(&padded.column_cells(i))))
            .collect();

        let mut data = SheetData::new(columns, padded.into_rows());
        CleaningService::clean(&mut data);

        info!(
            "Read {} rows x {} columns from {}",
            data.row_count(),
            data.column_count(),
            path.display()
        );

        Ok(data)
    }
}
