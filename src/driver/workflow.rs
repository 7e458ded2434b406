//! Workflow Orchestration
//!
//! 読み込みからロードまでのワークフローのオーケストレーション

use anyhow::{bail, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::adapter::bigquery::models::BigQueryTableRef;
use crate::adapter::config::Config;
use crate::adapter::console::progress;
use crate::adapter::console::terminal_console::TerminalConsole;
use crate::adapter::repositories::calamine_spreadsheet_repository::CalamineSpreadsheetRepository;
use crate::adapter::repositories::csv_staging_repository::CsvStagingRepository;
use crate::application::dto::load_config::LoadConfig;
use crate::application::use_cases::load_table::{LoadSummary, LoadTableUseCase};
use crate::application::use_cases::read_sheet::ReadSheetUseCase;
use crate::application::use_cases::resolve_types::{ResolveTypesUseCase, SEPARATOR};
use crate::application::use_cases::stage_file::StageFileUseCase;
use crate::domain::entities::staged_file::StagedFile;
use crate::domain::entities::table_definition::TableDefinition;
use crate::domain::entities::warehouse::Warehouse;
use crate::domain::repositories::operator_console::OperatorConsole;
use crate::domain::repositories::warehouse_repository::WarehouseRepository;
use crate::domain::services::coercion::CoercionService;
use crate::domain::services::ddl::DdlService;

use super::cli::Args;
use super::connector::{CloudWarehouseConnector, WarehouseConnector};

pub const MISSING_FILE_MESSAGE: &str =
    "Excel file does not exist. Specify a valid/correct Excel file.";

/// 1回の実行結果
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// ステージングファイルのレコード数
    pub record_count: usize,
    pub ddl: String,
    pub staging_file: PathBuf,
    /// ドライランでは `None`
    pub load: Option<LoadSummary>,
}

/// Sheet Load Workflow
pub struct SheetLoadWorkflow {
    config: Config,
    connector: Arc<dyn WarehouseConnector>,
    read_use_case: ReadSheetUseCase<CalamineSpreadsheetRepository>,
    stage_use_case: StageFileUseCase<CsvStagingRepository>,
}

impl SheetLoadWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, Arc::new(CloudWarehouseConnector))
    }

    /// 接続方法を差し替えてワークフローを作る
    pub fn with_connector(config: Config, connector: Arc<dyn WarehouseConnector>) -> Self {
        let spreadsheet_repo = Arc::new(CalamineSpreadsheetRepository::new());
        let staging_repo = Arc::new(CsvStagingRepository::new());

        Self {
            config,
            connector,
            read_use_case: ReadSheetUseCase::new(spreadsheet_repo),
            stage_use_case: StageFileUseCase::new(staging_repo),
        }
    }

    /// 標準入出力で対話しながら実行
    pub async fn execute(&self, args: Args) -> Result<RunSummary> {
        let mut console = TerminalConsole::stdio();
        self.execute_with_console(args, &mut console).await
    }

    /// 指定したコンソールで対話しながら実行
    pub async fn execute_with_console<C: OperatorConsole>(
        &self,
        args: Args,
        console: &mut C,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let warehouse = Warehouse::from(args.warehouse);
        info!("Starting sheet load into {}...", warehouse);
        info!("Dry run: {}", args.dry_run);

        if !args.excel_file.is_file() {
            bail!(MISSING_FILE_MESSAGE);
        }
        DdlService::validate_table_name(&args.table, warehouse)?;

        let load_config = LoadConfig::new(warehouse, args.table.clone())
            .with_field_delimiter(self.config.field_delimiter_byte()?)
            .with_interactive(!args.no_prompt)
            .with_type_overrides(args.type_overrides.clone());

        // 型の確認に答えてもらう前に接続設定の誤りを出す
        let repository = if args.dry_run {
            None
        } else {
            Some(self.connector.connect(warehouse, &self.config).await?)
        };

        println!("Reading Excel file:");
        let spinner = progress::spinner(&format!("Reading {}", args.excel_file.display()));
        let read_result = self
            .read_use_case
            .execute(&args.excel_file, args.sheet.as_deref())
            .await;
        spinner.finish_and_clear();
        let mut data = read_result?;
        println!(
            "✓ Read {} rows, {} columns",
            data.row_count(),
            data.column_count()
        );

        ResolveTypesUseCase::new(console).execute(&mut data, &load_config)?;

        println!("Converting Excel file to CSV:");
        let spinner = progress::spinner("Converting data types");
        CoercionService::coerce_sheet(&mut data);
        spinner.finish_and_clear();

        let staging_path = args
            .staging_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.staging_file));
        let staged = self
            .stage_use_case
            .execute(&data, &staging_path, &load_config)
            .await?;
        println!(
            "✓ Wrote {} records to {}",
            staged.record_count(),
            staged.path().display()
        );

        let definition = TableDefinition::from_sheet(args.table.clone(), &data);
        let ddl = DdlService::create_table(
            warehouse,
            &self.qualified_table_name(warehouse, &args.table),
            &definition,
        )?;
        println!("{}", SEPARATOR);
        println!("{}", ddl);

        let load = match repository {
            None => {
                println!("✓ Dry-run mode (not loading into {})", warehouse);
                None
            }
            Some(repository) => Some(run_load(repository, &definition, &staged, warehouse).await?),
        };

        println!("Number of records in the CSV file: {}", staged.record_count());

        if let Some(summary) = &load {
            if summary.is_complete() && !args.keep_staging_file {
                remove_staging_file(staged.path());
            }
        }

        println!(
            "Script execution time: {:.2} seconds",
            started.elapsed().as_secs_f64()
        );

        Ok(RunSummary {
            record_count: staged.record_count(),
            ddl,
            staging_file: staging_path,
            load,
        })
    }

    /// DDL表示用の修飾済みテーブル名
    ///
    /// BigQueryで接続先が設定されていない場合はテーブル名のまま
    fn qualified_table_name(&self, warehouse: Warehouse, table: &str) -> String {
        match (warehouse, self.config.bigquery.as_ref()) {
            (Warehouse::BigQuery, Some(bq)) => {
                BigQueryTableRef::resolve(&bq.project_id, &bq.dataset, table)
                    .map(|t| t.qualified_name())
                    .unwrap_or_else(|_| table.to_string())
            }
            _ => table.to_string(),
        }
    }
}

/// スピナーを出しながらテーブルを作り直してロード
///
/// ロード中の進捗はlogに出し、結果はスピナーを消してから表示する
async fn run_load(
    repository: Arc<dyn WarehouseRepository>,
    definition: &TableDefinition,
    staged: &StagedFile,
    warehouse: Warehouse,
) -> Result<LoadSummary> {
    let spinner = progress::spinner(&format!(
        "Loading {} rows into {} table {}",
        staged.record_count(),
        warehouse,
        definition.table_name
    ));
    let result = LoadTableUseCase::new(repository)
        .execute(definition, staged)
        .await;
    spinner.finish_and_clear();

    let summary = result?;
    if summary.is_complete() {
        println!(
            "✓ Loaded {} rows into {} table {}",
            summary.loaded_count, warehouse, definition.table_name
        );
    } else {
        println!(
            "⚠ {} rows failed to load into {} (staging file kept)",
            summary.failed_count, definition.table_name
        );
    }
    Ok(summary)
}

fn remove_staging_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!("Removed staging file {}", path.display()),
        Err(e) => println!("⚠ Failed to remove {}: {}", path.display(), e),
    }
}
