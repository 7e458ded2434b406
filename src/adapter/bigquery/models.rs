//! BigQuery Models
//!
//! テーブル参照・スキーマ・ロードジョブの組み立て

use anyhow::{bail, Result};
use google_cloud_bigquery::http::job::{
    CreateDisposition, Job, JobConfiguration, JobConfigurationLoad, JobReference, JobState,
    JobType, WriteDisposition,
};
use google_cloud_bigquery::http::table::{
    SourceFormat, Table, TableFieldMode, TableFieldSchema, TableFieldType, TableReference,
    TableSchema,
};

use crate::adapter::gcs::bucket::GcsObject;
use crate::domain::entities::column::ColumnType;
use crate::domain::entities::staged_file::StagedFile;
use crate::domain::entities::table_definition::TableDefinition;

/// `project.dataset.table` に解決済みのテーブル参照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigQueryTableRef {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl BigQueryTableRef {
    /// テーブル名を解決する
    ///
    /// 省略されたプロジェクト・データセットは設定値で補う
    ///
    /// # Errors
    ///
    /// 4要素以上の場合、またはデータセットが決まらない場合
    pub fn resolve(default_project: &str, default_dataset: &str, name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        let (project, dataset, table) = match parts.as_slice() {
            [table] => (default_project, default_dataset, *table),
            [dataset, table] => (default_project, *dataset, *table),
            [project, dataset, table] => (*project, *dataset, *table),
            _ => bail!("Invalid BigQuery table name: {}", name),
        };

        if project.is_empty() || dataset.is_empty() {
            bail!(
                "BigQuery project and dataset are required for table {} (set them in the config file)",
                name
            );
        }

        Ok(Self {
            project_id: project.to_string(),
            dataset_id: dataset.to_string(),
            table_id: table.to_string(),
        })
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }

    fn table_reference(&self) -> TableReference {
        TableReference {
            project_id: self.project_id.clone(),
            dataset_id: self.dataset_id.clone(),
            table_id: self.table_id.clone(),
        }
    }
}

/// ロードジョブの参照（ジョブの取得に使う）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJobRef {
    pub project_id: String,
    pub job_id: String,
    pub location: Option<String>,
}

impl LoadJobRef {
    /// 実行ごとに一意なジョブIDを作る
    pub fn new(project_id: &str, run_id: &str, location: Option<String>) -> Self {
        Self {
            project_id: project_id.to_string(),
            job_id: format!("sheetload_{}", run_id),
            location,
        }
    }
}

/// ジョブの状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobProgress {
    pub done: bool,
    /// 完了したジョブのエラー（成功なら `None`）
    pub error: Option<String>,
}

impl JobProgress {
    pub fn from_job(job: &Job) -> Self {
        Self {
            done: matches!(job.status.state, JobState::Done),
            error: job
                .status
                .error_result
                .as_ref()
                .map(|e| format!("{:?}", e)),
        }
    }
}

/// 列型に対応するBigQueryのフィールド型
pub fn field_type(column_type: ColumnType) -> TableFieldType {
    match column_type {
        ColumnType::Integer => TableFieldType::Integer,
        ColumnType::Float => TableFieldType::Float,
        ColumnType::String => TableFieldType::String,
        ColumnType::Boolean => TableFieldType::Boolean,
        ColumnType::Date => TableFieldType::Date,
        ColumnType::Timestamp => TableFieldType::Timestamp,
        ColumnType::Time => TableFieldType::Time,
    }
}

fn table_schema(definition: &TableDefinition) -> TableSchema {
    let fields = definition
        .fields
        .iter()
        .map(|f| TableFieldSchema {
            name: f.name.clone(),
            data_type: field_type(f.column_type),
            mode: Some(TableFieldMode::Nullable),
            ..Default::default()
        })
        .collect();
    TableSchema { fields }
}

/// テーブル作成リクエストを組み立てる
pub fn build_table(table_ref: &BigQueryTableRef, definition: &TableDefinition) -> Table {
    Table {
        table_reference: table_ref.table_reference(),
        schema: Some(table_schema(definition)),
        ..Default::default()
    }
}

/// ステージングファイルを読み込むロードジョブを組み立てる
///
/// ヘッダー行を読み飛ばし、既存データは置き換える（WRITE_TRUNCATE）
pub fn build_load_job(
    job_ref: &LoadJobRef,
    table_ref: &BigQueryTableRef,
    definition: &TableDefinition,
    source: &GcsObject,
    file: &StagedFile,
) -> Job {
    let load = JobConfigurationLoad {
        source_uris: vec![source.uri()],
        destination_table: table_ref.table_reference(),
        schema: Some(table_schema(definition)),
        source_format: Some(SourceFormat::Csv),
        field_delimiter: Some(file.delimiter_str()),
        skip_leading_rows: Some(StagedFile::HEADER_ROWS as i64),
        allow_quoted_newlines: Some(true),
        create_disposition: Some(CreateDisposition::CreateIfNeeded),
        write_disposition: Some(WriteDisposition::WriteTruncate),
        ..Default::default()
    };

    Job {
        job_reference: JobReference {
            project_id: job_ref.project_id.clone(),
            job_id: job_ref.job_id.clone(),
            location: job_ref.location.clone(),
        },
        configuration: JobConfiguration {
            job: JobType::Load(load),
            ..Default::default()
        },
        ..Default::default()
    }
}
