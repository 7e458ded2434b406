//! sheetload - Spreadsheet to Warehouse Loader
//!
//! スプレッドシートを BigQuery / Snowflake のテーブルにロード

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use sheetload::adapter::config::Config;
use sheetload::driver::{Args, SheetLoadWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = Config::load(&args.config)?;

    let workflow = SheetLoadWorkflow::new(config);

    workflow.execute(args).await?;
    Ok(())
}
