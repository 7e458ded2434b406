//! Calamine Spreadsheet Repository Implementation
//!
//! SpreadsheetRepositoryの実装（Excel/ODSはcalamine、CSVはcsvクレート）

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::domain::entities::cell::CellValue;
use crate::domain::repositories::spreadsheet_repository::{RawSheet, SpreadsheetRepository};
use crate::domain::services::coercion::parse_datetime;

/// スプレッドシートリポジトリ
pub struct CalamineSpreadsheetRepository;

impl CalamineSpreadsheetRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// 拡張子が `.csv` かどうか
    fn is_csv(path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }

    /// Excel/ODSのシートを読み込む（同期処理）
    fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawSheet> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook {}", path.display()))?;

        let sheet_name = match sheet {
            Some(name) => name.to_string(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| anyhow!("No sheet in {}", path.display()))?,
        };
        debug!("Reading sheet '{}' from {}", sheet_name, path.display());

        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header) => header.iter().map(header_text).collect(),
            None => return Ok(RawSheet::default()),
        };
        let rows = rows
            .map(|row| row.iter().map(data_to_cell_value).collect())
            .collect();

        Ok(RawSheet { headers, rows })
    }

    /// CSVを読み込む（同期処理）
    fn read_csv(path: &Path) -> Result<RawSheet> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

        let headers = reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record =
                record.with_context(|| format!("Failed to read CSV record {}", line + 2))?;
            rows.push(record.iter().map(parse_csv_field).collect());
        }

        Ok(RawSheet { headers, rows })
    }

    fn read_sync(path: &Path, sheet: Option<&str>) -> Result<RawSheet> {
        let raw = if Self::is_csv(path) {
            Self::read_csv(path)?
        } else {
            Self::read_workbook(path, sheet)?
        };

        info!(
            "Loaded {} data rows with {} headers from {}",
            raw.rows.len(),
            raw.headers.len(),
            path.display()
        );
        Ok(raw)
    }
}

/// calamineのセルをCellValueに変換
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                CellValue::Float(dt.as_f64())
            } else {
                dt.as_datetime()
                    .map_or(CellValue::Float(dt.as_f64()), CellValue::DateTime)
            }
        }
        Data::DateTimeIso(s) => {
            parse_datetime(s).map_or_else(|| CellValue::String(s.clone()), CellValue::DateTime)
        }
        Data::DurationIso(s) => CellValue::String(s.clone()),
        // エラーセル（#DIV/0! など）は空として扱う
        Data::Error(_) => CellValue::Null,
    }
}

/// ヘッダーセルの文字列表現
fn header_text(data: &Data) -> String {
    match data {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => data_to_cell_value(other).to_text(),
    }
}

/// CSVのフィールドをスカラー値として解釈
fn parse_csv_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => CellValue::Bool(true),
        "false" => CellValue::Bool(false),
        _ => CellValue::String(field.to_string()),
    }
}

#[async_trait]
impl SpreadsheetRepository for CalamineSpreadsheetRepository {
    async fn read_sheet(&self, path: &Path, sheet: Option<&str>) -> Result<RawSheet> {
        let path: PathBuf = path.to_path_buf();
        let sheet = sheet.map(str::to_string);
        tokio::task::spawn_blocking(move || Self::read_sync(&path, sheet.as_deref()))
            .await
            .map_err(|e| anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

impl Default for CalamineSpreadsheetRepository {
    fn default() -> Self {
        Self::new()
    }
}
