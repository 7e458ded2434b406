//! # Load Configuration DTO
//!
//! ロード設定のData Transfer Object

use crate::domain::entities::warehouse::Warehouse;

/// デフォルトの区切り文字
pub const DEFAULT_FIELD_DELIMITER: u8 = b'|';

/// ロード設定
///
/// 1回のロード実行に必要な設定情報
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// ロード先ウェアハウス
    pub warehouse: Warehouse,
    /// ロード先テーブル名
    pub table_name: String,
    /// ステージングファイルの区切り文字
    pub field_delimiter: u8,
    /// 対話的な型確認を行うかどうか
    pub interactive: bool,
    /// `COLUMN=TYPE` 形式の事前指定オーバーライド
    pub type_overrides: Vec<String>,
}

impl LoadConfig {
    /// 新しいロード設定を作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use sheetload::application::dto::load_config::LoadConfig;
    /// use sheetload::domain::entities::warehouse::Warehouse;
    ///
    /// let config = LoadConfig::new(Warehouse::Snowflake, "SALES".to_string())
    ///     .with_interactive(false)
    ///     .with_type_overrides(vec!["AMOUNT=float".to_string()]);
    ///
    /// assert_eq!(config.field_delimiter, b'|');
    /// assert!(!config.interactive);
    /// ```
    pub fn new(warehouse: Warehouse, table_name: String) -> Self {
        Self {
            warehouse,
            table_name,
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            interactive: true,
            type_overrides: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field_delimiter(mut self, delimiter: u8) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[must_use]
    pub fn with_type_overrides(mut self, overrides: Vec<String>) -> Self {
        self.type_overrides = overrides;
        self
    }
}
