//! # StagedFile Value Object
//!
//! ロード元となる書き出し済みの区切りファイル

use std::path::{Path, PathBuf};

/// ステージングファイル
///
/// 先頭1行がヘッダー、以降がデータ行の区切りファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    path: PathBuf,
    delimiter: u8,
    record_count: usize,
}

impl StagedFile {
    /// 読み飛ばすヘッダー行数
    pub const HEADER_ROWS: usize = 1;

    pub fn new(path: impl Into<PathBuf>, delimiter: u8, record_count: usize) -> Self {
        Self {
            path: path.into(),
            delimiter,
            record_count,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// 区切り文字を文字列として返す（ロード設定用）
    pub fn delimiter_str(&self) -> String {
        char::from(self.delimiter).to_string()
    }

    /// ヘッダーを除いたデータ行数
    #[inline]
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
