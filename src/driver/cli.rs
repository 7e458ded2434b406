//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::domain::entities::warehouse::Warehouse;

/// ロード先ウェアハウスの指定
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseArg {
    #[value(alias = "gbq")]
    Bigquery,
    Snowflake,
}

impl From<WarehouseArg> for Warehouse {
    fn from(arg: WarehouseArg) -> Self {
        match arg {
            WarehouseArg::Bigquery => Warehouse::BigQuery,
            WarehouseArg::Snowflake => Warehouse::Snowflake,
        }
    }
}

/// スプレッドシートをウェアハウスのテーブルにロードするCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "sheetload")]
#[command(about = "Load a spreadsheet into a BigQuery or Snowflake table", long_about = None)]
pub struct Args {
    /// Spreadsheet to load (.xlsx, .xls, .xlsm, .xlsb, .ods or .csv)
    #[arg(short = 'e', long)]
    pub excel_file: PathBuf,

    /// Target table name (the table is replaced)
    #[arg(short, long)]
    pub table: String,

    /// Target warehouse
    #[arg(short, long, value_enum, default_value_t = WarehouseArg::Bigquery)]
    pub warehouse: WarehouseArg,

    /// Sheet name (defaults to the first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Config file path
    #[arg(short, long, default_value = "./sheetload.json")]
    pub config: String,

    /// Preset column type, e.g. --type PRICE=float (repeatable)
    #[arg(long = "type", value_name = "COLUMN=TYPE")]
    pub type_overrides: Vec<String>,

    /// Skip the interactive type prompt
    #[arg(long)]
    pub no_prompt: bool,

    /// Dry run mode - write the staging file and print the DDL without touching the warehouse
    #[arg(long)]
    pub dry_run: bool,

    /// Staging file path (overrides the config file)
    #[arg(long)]
    pub staging_file: Option<PathBuf>,

    /// Keep the staging file after a successful load
    #[arg(long)]
    pub keep_staging_file: bool,
}
