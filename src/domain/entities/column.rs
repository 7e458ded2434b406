//! # Column Entity
//!
//! 列の推論型・ウェアハウス型・列定義

use std::fmt;

/// ファイルから推論された型
///
/// 表示名はデータフレームのdtype名に合わせている
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Int64,
    Float64,
    Bool,
    DateTime,
    Object,
}

impl SourceType {
    /// dtype名
    pub fn dtype_name(&self) -> &'static str {
        match self {
            SourceType::Int64 => "int64",
            SourceType::Float64 => "float64",
            SourceType::Bool => "bool",
            SourceType::DateTime => "datetime64[ns]",
            SourceType::Object => "object",
        }
    }

    /// 推論型に対応するデフォルトのウェアハウス型
    pub fn default_column_type(&self) -> ColumnType {
        match self {
            SourceType::Int64 => ColumnType::Integer,
            SourceType::Float64 => ColumnType::Float,
            SourceType::Bool => ColumnType::Boolean,
            SourceType::DateTime => ColumnType::Date,
            SourceType::Object => ColumnType::String,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dtype_name())
    }
}

/// ウェアハウス側の列型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    Timestamp,
    Time,
}

impl ColumnType {
    /// 型名（大文字）
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "FLOAT",
            ColumnType::String => "STRING",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Time => "TIME",
        }
    }

    /// オペレーターが入力するキーワード
    pub fn keyword(&self) -> &'static str {
        match self {
            ColumnType::Integer => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Boolean => "bool",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Time => "time",
        }
    }

    /// キーワードから型を引く（大文字小文字は区別しない）
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "int" => Some(ColumnType::Integer),
            "float" => Some(ColumnType::Float),
            "string" => Some(ColumnType::String),
            "bool" => Some(ColumnType::Boolean),
            "date" => Some(ColumnType::Date),
            "timestamp" => Some(ColumnType::Timestamp),
            "time" => Some(ColumnType::Time),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 列定義
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// 正規化済みの列名
    pub name: String,
    /// 推論型
    pub source_type: SourceType,
    /// 確定したウェアハウス型
    pub column_type: ColumnType,
    /// オーバーライドで型が決まったかどうか
    pub overridden: bool,
}

impl Column {
    /// 推論型からデフォルト型を設定して列を作成
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            name: name.into(),
            source_type,
            column_type: source_type.default_column_type(),
            overridden: false,
        }
    }

    /// デフォルト型
    pub fn default_type(&self) -> ColumnType {
        self.source_type.default_column_type()
    }

    /// 型をオーバーライドする
    pub fn override_type(&mut self, column_type: ColumnType) {
        self.column_type = column_type;
        self.overridden = true;
    }
}
