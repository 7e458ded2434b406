//! Workflow Integration Tests
//!
//! SheetLoadWorkflow の統合テスト（ドライランとモック接続先へのロード）

use anyhow::Result;
use async_trait::async_trait;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use sheetload::adapter::config::Config;
use sheetload::domain::entities::staged_file::StagedFile;
use sheetload::domain::entities::table_definition::TableDefinition;
use sheetload::domain::entities::warehouse::Warehouse;
use sheetload::domain::repositories::operator_console::OperatorConsole;
use sheetload::domain::repositories::warehouse_repository::{LoadResult, WarehouseRepository};
use sheetload::driver::cli::{Args, WarehouseArg};
use sheetload::driver::connector::WarehouseConnector;
use sheetload::driver::workflow::{RunSummary, SheetLoadWorkflow, MISSING_FILE_MESSAGE};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// 決められた入力を返すコンソール
struct ScriptedConsole {
    answers: VecDeque<String>,
    shown: Vec<String>,
}

impl ScriptedConsole {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            shown: Vec::new(),
        }
    }
}

impl OperatorConsole for ScriptedConsole {
    fn show(&mut self, line: &str) {
        self.shown.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.shown.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

/// ロード内容を記録するウェアハウス
struct RecordingWarehouse {
    failed_rows: usize,
    calls: Mutex<Vec<String>>,
}

impl RecordingWarehouse {
    fn new(failed_rows: usize) -> Self {
        Self {
            failed_rows,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarehouseRepository for RecordingWarehouse {
    async fn replace_table(&self, definition: &TableDefinition) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("replace {}", definition.table_name));
        Ok(())
    }

    async fn load_file(&self, definition: &TableDefinition, file: &StagedFile) -> Result<LoadResult> {
        // ロード時点でファイルが読めること
        let content = fs::read_to_string(file.path())?;
        self.calls.lock().unwrap().push(format!(
            "load {} lines into {}",
            content.lines().count(),
            definition.table_name
        ));
        Ok(LoadResult::new(
            file.record_count() - self.failed_rows,
            self.failed_rows,
        ))
    }
}

/// 設定を検証してから記録用ウェアハウスを返す接続先
struct StubConnector {
    warehouse: Arc<RecordingWarehouse>,
    connected: Mutex<Vec<Warehouse>>,
}

impl StubConnector {
    fn new(failed_rows: usize) -> Self {
        Self {
            warehouse: Arc::new(RecordingWarehouse::new(failed_rows)),
            connected: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WarehouseConnector for StubConnector {
    async fn connect(
        &self,
        warehouse: Warehouse,
        config: &Config,
    ) -> Result<Arc<dyn WarehouseRepository>> {
        match warehouse {
            Warehouse::BigQuery => {
                config.bigquery()?.load_settings()?;
            }
            Warehouse::Snowflake => {
                config.snowflake()?;
            }
        }
        self.connected.lock().unwrap().push(warehouse);
        Ok(self.warehouse.clone())
    }
}

/// テスト用のExcelファイルを作成
fn create_test_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("orders.xlsx");
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let worksheet = workbook.add_worksheet();

    let headers = ["Order Id", "Customer  Name", "Amount ($)", "Order Date", "Paid"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }

    let rows: [(f64, &str, Option<f64>, &str, bool); 3] = [
        (1.0, "  Ada   Lovelace ", Some(10.5), "2024-03-05", true),
        (2.0, "Alan Turing", Some(20.0), "2024-03-06", false),
        (3.0, "Grace Hopper", None, "2024-03-07", true),
    ];
    for (i, (id, name, amount, date, paid)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, *id).unwrap();
        worksheet.write_string(row, 1, *name).unwrap();
        if let Some(amount) = amount {
            worksheet.write_number(row, 2, *amount).unwrap();
        }
        let date = ExcelDateTime::parse_from_str(date).unwrap();
        worksheet
            .write_datetime_with_format(row, 3, &date, &date_format)
            .unwrap();
        worksheet.write_boolean(row, 4, *paid).unwrap();
    }

    workbook.save(&path).unwrap();
    path
}

/// テスト用のConfigファイルを作成
fn create_test_config(dir: &Path) -> String {
    let config_path = dir.join("sheetload.json");
    let config_content = r#"{
  "bigquery": {
    "project_id": "test-project",
    "dataset": "test_dataset",
    "location": "US",
    "staging_bucket": "test-bucket"
  }
}"#;
    fs::write(&config_path, config_content).unwrap();
    config_path.to_string_lossy().to_string()
}

fn create_args(excel_file: PathBuf, staging_file: PathBuf, config: String) -> Args {
    Args {
        excel_file,
        table: "ORDERS".to_string(),
        warehouse: WarehouseArg::Bigquery,
        sheet: None,
        config,
        type_overrides: Vec::new(),
        no_prompt: true,
        dry_run: true,
        staging_file: Some(staging_file),
        keep_staging_file: false,
    }
}

#[tokio::test]
async fn test_workflow_dry_run_bigquery_with_preset() {
    let temp_dir = TempDir::new().unwrap();
    let excel_file = create_test_workbook(temp_dir.path());
    let staging_file = temp_dir.path().join("staging.csv");
    let config_path = create_test_config(temp_dir.path());
    let config = Config::load(&config_path).unwrap();

    let mut args = create_args(excel_file, staging_file.clone(), config_path);
    args.type_overrides = vec!["amount=int".to_string()];

    let workflow = SheetLoadWorkflow::new(config);
    let mut console = ScriptedConsole::new(&[]);
    let summary = workflow
        .execute_with_console(args, &mut console)
        .await
        .unwrap();

    assert_eq!(summary.record_count, 3);
    assert!(summary.load.is_none());
    assert_eq!(
        summary.ddl,
        "CREATE OR REPLACE TABLE `test-project.test_dataset.ORDERS` \
         (ORDER_ID INT64, CUSTOMER_NAME STRING, AMOUNT INT64, ORDER_DATE DATE, PAID BOOL)"
    );

    let content = fs::read_to_string(&staging_file).unwrap();
    assert_eq!(
        content,
        "ORDER_ID|CUSTOMER_NAME|AMOUNT|ORDER_DATE|PAID\n\
         1|Ada Lovelace|10|2024-03-05|true\n\
         2|Alan Turing|20|2024-03-06|false\n\
         3|Grace Hopper|0|2024-03-07|true\n"
    );

    assert!(console.shown.contains(&"1. ORDER_ID: int64".to_string()));
    assert!(console.shown.contains(&"3. AMOUNT: float64".to_string()));
    assert!(console.shown.contains(&"4. ORDER_DATE: datetime64[ns]".to_string()));
    assert!(console.shown.contains(&"AMOUNT: INTEGER".to_string()));
}

#[tokio::test]
async fn test_workflow_dry_run_snowflake_interactive() {
    let temp_dir = TempDir::new().unwrap();
    let excel_file = create_test_workbook(temp_dir.path());
    let staging_file = temp_dir.path().join("staging.csv");

    let mut args = create_args(excel_file, staging_file.clone(), String::new());
    args.warehouse = WarehouseArg::Snowflake;
    args.no_prompt = false;

    let workflow = SheetLoadWorkflow::new(Config::default());
    let mut console = ScriptedConsole::new(&["x", "9", "5", "string", "4", "time", "exit"]);
    let summary = workflow
        .execute_with_console(args, &mut console)
        .await
        .unwrap();

    assert_eq!(
        summary.ddl,
        "CREATE OR REPLACE TABLE ORDERS \
         (ORDER_ID INTEGER, CUSTOMER_NAME STRING, AMOUNT FLOAT, ORDER_DATE TIME, PAID STRING)"
    );
    assert!(console
        .shown
        .contains(&"Invalid input. Please enter a valid column index or 'exit' to finish.".to_string()));
    assert!(console
        .shown
        .contains(&"Invalid column index. Please choose a valid index.".to_string()));

    let content = fs::read_to_string(&staging_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[1], "1|Ada Lovelace|10.5|00:00:00|true");
    assert_eq!(lines[3], "3|Grace Hopper||00:00:00|true");
    assert!(summary.load.is_none());
}

#[tokio::test]
async fn test_workflow_missing_excel_file() {
    let temp_dir = TempDir::new().unwrap();
    let args = create_args(
        temp_dir.path().join("missing.xlsx"),
        temp_dir.path().join("staging.csv"),
        String::new(),
    );

    let workflow = SheetLoadWorkflow::new(Config::default());
    let mut console = ScriptedConsole::new(&[]);
    let result = workflow.execute_with_console(args, &mut console).await;

    let error = result.unwrap_err();
    assert_eq!(error.to_string(), MISSING_FILE_MESSAGE);
}

#[tokio::test]
async fn test_workflow_rejects_unknown_preset_column() {
    let temp_dir = TempDir::new().unwrap();
    let excel_file = create_test_workbook(temp_dir.path());
    let staging_file = temp_dir.path().join("staging.csv");

    let mut args = create_args(excel_file, staging_file.clone(), String::new());
    args.type_overrides = vec!["DISCOUNT=float".to_string()];

    let workflow = SheetLoadWorkflow::new(Config::default());
    let mut console = ScriptedConsole::new(&[]);
    let result = workflow.execute_with_console(args, &mut console).await;

    assert!(result.is_err());
    assert!(!staging_file.exists());
}

#[tokio::test]
async fn test_workflow_rejects_invalid_table_name() {
    let temp_dir = TempDir::new().unwrap();
    let excel_file = create_test_workbook(temp_dir.path());

    let mut args = create_args(excel_file, temp_dir.path().join("staging.csv"), String::new());
    args.table = "orders; DROP TABLE x".to_string();

    let workflow = SheetLoadWorkflow::new(Config::default());
    let mut console = ScriptedConsole::new(&[]);
    let result = workflow.execute_with_console(args, &mut console).await;

    assert!(result.is_err());
}

/// モック接続先へのロードを実行（TempDirは呼び出し側で保持する）
async fn run_load(
    temp_dir: &TempDir,
    connector: Arc<StubConnector>,
    keep_staging_file: bool,
) -> (PathBuf, Result<RunSummary>) {
    let excel_file = create_test_workbook(temp_dir.path());
    let staging_file = temp_dir.path().join("staging.csv");
    let config_path = create_test_config(temp_dir.path());
    let config = Config::load(&config_path).unwrap();

    let mut args = create_args(excel_file, staging_file.clone(), config_path);
    args.dry_run = false;
    args.keep_staging_file = keep_staging_file;

    let workflow = SheetLoadWorkflow::with_connector(config, connector);
    let mut console = ScriptedConsole::new(&[]);
    let result = workflow.execute_with_console(args, &mut console).await;
    (staging_file, result)
}

#[tokio::test]
async fn test_workflow_load_removes_staging_file() {
    let temp_dir = TempDir::new().unwrap();
    let connector = Arc::new(StubConnector::new(0));

    let (staging_file, result) = run_load(&temp_dir, connector.clone(), false).await;
    let summary = result.unwrap();

    let load = summary.load.unwrap();
    assert_eq!(load.loaded_count, 3);
    assert_eq!(load.failed_count, 0);
    assert_eq!(
        connector.warehouse.calls(),
        vec!["replace ORDERS", "load 4 lines into ORDERS"]
    );
    assert_eq!(*connector.connected.lock().unwrap(), vec![Warehouse::BigQuery]);
    assert!(!staging_file.exists());
}

#[tokio::test]
async fn test_workflow_load_keeps_staging_file_when_asked() {
    let temp_dir = TempDir::new().unwrap();
    let connector = Arc::new(StubConnector::new(0));

    let (staging_file, result) = run_load(&temp_dir, connector.clone(), true).await;

    assert!(result.unwrap().load.unwrap().is_complete());
    assert!(staging_file.exists());
}

#[tokio::test]
async fn test_workflow_load_keeps_staging_file_on_failed_rows() {
    let temp_dir = TempDir::new().unwrap();
    let connector = Arc::new(StubConnector::new(1));

    let (staging_file, result) = run_load(&temp_dir, connector.clone(), false).await;

    let load = result.unwrap().load.unwrap();
    assert_eq!(load.loaded_count, 2);
    assert_eq!(load.failed_count, 1);
    assert!(staging_file.exists());
}

#[tokio::test]
async fn test_workflow_load_without_config_section_fails_before_reading() {
    let temp_dir = TempDir::new().unwrap();
    let excel_file = create_test_workbook(temp_dir.path());
    let staging_file = temp_dir.path().join("staging.csv");

    let mut args = create_args(excel_file, staging_file.clone(), String::new());
    args.dry_run = false;

    let connector = Arc::new(StubConnector::new(0));
    let workflow = SheetLoadWorkflow::with_connector(Config::default(), connector.clone());
    let mut console = ScriptedConsole::new(&[]);
    let error = workflow
        .execute_with_console(args, &mut console)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Config file has no \"bigquery\" section");
    assert!(connector.warehouse.calls().is_empty());
    assert!(!staging_file.exists());
}

#[tokio::test]
async fn test_workflow_load_default_connector_without_config_section() {
    let temp_dir = TempDir::new().unwrap();
    let excel_file = create_test_workbook(temp_dir.path());

    let mut args = create_args(excel_file, temp_dir.path().join("staging.csv"), String::new());
    args.dry_run = false;
    args.warehouse = WarehouseArg::Snowflake;

    let workflow = SheetLoadWorkflow::new(Config::default());
    let mut console = ScriptedConsole::new(&[]);
    let error = workflow
        .execute_with_console(args, &mut console)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Config file has no \"snowflake\" section");
}
