//! # Resolve Types Use Case
//!
//! 推論型の確認とオーバーライドユースケース

use anyhow::Result;
use log::info;

use crate::application::dto::load_config::LoadConfig;
use crate::domain::entities::column::ColumnType;
use crate::domain::entities::sheet_data::SheetData;
use crate::domain::error::SheetLoadError;
use crate::domain::repositories::operator_console::OperatorConsole;
use crate::domain::services::type_override::TypeOverrideService;

pub const SEPARATOR: &str = "__________________________________________________________________________________________________________________";

const EXIT_COMMAND: &str = "exit";

/// 確認済みの列と型
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSummary {
    /// 確認した順の (列名, 型)。同じ列を再確認した場合は最後の値
    pub reviewed: Vec<(String, ColumnType)>,
}

impl OverrideSummary {
    fn record(&mut self, column: &str, column_type: ColumnType) {
        match self.reviewed.iter_mut().find(|(name, _)| name == column) {
            Some(entry) => entry.1 = column_type,
            None => self.reviewed.push((column.to_string(), column_type)),
        }
    }

    pub fn get(&self, column: &str) -> Option<ColumnType> {
        self.reviewed
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, t)| *t)
    }
}

/// 型確認ユースケース
///
/// 推論した列型を表示し、事前指定とオペレーターの入力で型を確定する
pub struct ResolveTypesUseCase<'a, C: OperatorConsole> {
    console: &'a mut C,
}

impl<'a, C: OperatorConsole> ResolveTypesUseCase<'a, C> {
    /// 新しいユースケースを作成
    pub fn new(console: &'a mut C) -> Self {
        Self { console }
    }

    /// 列型を確定する
    ///
    /// # Arguments
    ///
    /// * `data` - 推論済みの表データ（列型が更新される）
    /// * `config` - ロード設定
    ///
    /// # Errors
    ///
    /// 事前指定オーバーライドの列名・型が不正な場合、または入力の読み込みに失敗した場合
    pub fn execute(&mut self, data: &mut SheetData, config: &LoadConfig) -> Result<OverrideSummary> {
        self.display_columns(data, config);

        let mut summary = OverrideSummary::default();
        self.apply_presets(data, config, &mut summary)?;

        if config.interactive {
            self.console.show(SEPARATOR);
            self.prompt_loop(data, config, &mut summary)?;
        }

        self.console.show(SEPARATOR);
        self.console.show("Modified Data Types:");
        for (column, column_type) in &summary.reviewed {
            self.console.show(&format!("{}: {}", column, column_type));
        }

        info!("{} column types reviewed", summary.reviewed.len());

        Ok(summary)
    }

    fn display_columns(&mut self, data: &SheetData, config: &LoadConfig) {
        self.console.show(&format!(
            "Column Names and Data Types ({}):",
            config.warehouse
        ));
        self.console.show(SEPARATOR);
        self.console.show(SEPARATOR);
        for (i, column) in data.columns().iter().enumerate() {
            self.console
                .show(&format!("{}. {}: {}", i + 1, column.name, column.source_type));
        }
    }

    fn apply_presets(
        &mut self,
        data: &mut SheetData,
        config: &LoadConfig,
        summary: &mut OverrideSummary,
    ) -> Result<()> {
        for entry in &config.type_overrides {
            let preset = TypeOverrideService::parse_preset(entry)?;
            let index = data
                .column_index(&preset.column)
                .ok_or_else(|| SheetLoadError::UnknownColumn(preset.column.clone()))?;
            let column_type = TypeOverrideService::resolve_preset(&preset, config.warehouse)?;

            data.columns_mut()[index].override_type(column_type);
            summary.record(&preset.column, column_type);
        }
        Ok(())
    }

    fn prompt_loop(
        &mut self,
        data: &mut SheetData,
        config: &LoadConfig,
        summary: &mut OverrideSummary,
    ) -> Result<()> {
        loop {
            let choice = match self
                .console
                .ask("Enter the column index to modify or 'exit' to finish: ")?
            {
                Some(line) => line.trim().to_string(),
                None => break,
            };

            if choice == EXIT_COMMAND {
                break;
            }

            let index = match choice.parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    self.console.show(
                        "Invalid input. Please enter a valid column index or 'exit' to finish.",
                    );
                    continue;
                }
            };
            if index == 0 || index > data.column_count() {
                self.console
                    .show("Invalid column index. Please choose a valid index.");
                continue;
            }

            let column = &data.columns()[index - 1];
            let name = column.name.clone();
            let default_type = column.default_type();
            let prompt = format!(
                "Specify data type for column '{}' (default: {}, acceptable: {}): ",
                name,
                default_type,
                config.warehouse.acceptable_keywords()
            );

            let answer = self.console.ask(&prompt)?.unwrap_or_default();
            let column = &mut data.columns_mut()[index - 1];
            match TypeOverrideService::parse(&answer, config.warehouse) {
                Some(column_type) => column.override_type(column_type),
                None => {
                    column.column_type = default_type;
                    column.overridden = false;
                }
            }
            summary.record(&name, column.column_type);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::domain::entities::cell::CellValue;
    use crate::domain::entities::column::{Column, SourceType};
    use crate::domain::entities::warehouse::Warehouse;

    struct ScriptedConsole {
        inputs: VecDeque<String>,
        output: Vec<String>,
    }

    impl ScriptedConsole {
        fn new(inputs: &[&str]) -> Self {
            Self {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                output: Vec::new(),
            }
        }

        fn printed(&self, needle: &str) -> bool {
            self.output.iter().any(|line| line.contains(needle))
        }
    }

    impl OperatorConsole for ScriptedConsole {
        fn show(&mut self, line: &str) {
            self.output.push(line.to_string());
        }

        fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
            self.output.push(prompt.to_string());
            Ok(self.inputs.pop_front())
        }
    }

    fn create_test_data() -> SheetData {
        SheetData::new(
            vec![
                Column::new("ID", SourceType::Int64),
                Column::new("PRICE", SourceType::Float64),
                Column::new("SOLD_ON", SourceType::Object),
            ],
            vec![vec![
                CellValue::Int(1),
                CellValue::Float(2.5),
                CellValue::String("2024-01-01".to_string()),
            ]],
        )
    }

    #[test]
    fn test_displays_inferred_types() {
        let mut console = ScriptedConsole::new(&["exit"]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::BigQuery, "T".to_string());

        ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        assert!(console.printed("Column Names and Data Types (GBQ):"));
        assert!(console.printed("1. ID: int64"));
        assert!(console.printed("2. PRICE: float64"));
        assert!(console.printed("3. SOLD_ON: object"));
    }

    #[test]
    fn test_interactive_override() {
        let mut console = ScriptedConsole::new(&["2", "int", "3", "date", "exit"]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::BigQuery, "T".to_string());

        let summary = ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        assert_eq!(data.columns()[1].column_type, ColumnType::Integer);
        assert_eq!(data.columns()[2].column_type, ColumnType::Date);
        assert!(data.columns()[1].overridden);
        assert_eq!(
            summary.reviewed,
            vec![
                ("PRICE".to_string(), ColumnType::Integer),
                ("SOLD_ON".to_string(), ColumnType::Date),
            ]
        );
        assert!(console.printed(
            "Specify data type for column 'PRICE' (default: FLOAT, acceptable: [int, float, string, timestamp, date, bool]): "
        ));
        assert!(console.printed("PRICE: INTEGER"));
    }

    #[test]
    fn test_unacceptable_keyword_keeps_default() {
        let mut console = ScriptedConsole::new(&["1", "varchar", "exit"]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::BigQuery, "T".to_string());

        let summary = ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        assert_eq!(data.columns()[0].column_type, ColumnType::Integer);
        assert!(!data.columns()[0].overridden);
        assert_eq!(summary.get("ID"), Some(ColumnType::Integer));
    }

    #[test]
    fn test_time_is_rejected_for_bigquery() {
        let mut console = ScriptedConsole::new(&["3", "time", "exit"]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::BigQuery, "T".to_string());

        ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        assert_eq!(data.columns()[2].column_type, ColumnType::String);
    }

    #[test]
    fn test_invalid_inputs_reprompt() {
        let mut console = ScriptedConsole::new(&["abc", "0", "9", "exit"]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::Snowflake, "T".to_string());

        let summary = ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        assert!(summary.reviewed.is_empty());
        assert!(console.printed("Invalid input. Please enter a valid column index"));
        assert!(console.printed("Invalid column index. Please choose a valid index."));
    }

    #[test]
    fn test_end_of_input_finishes() {
        let mut console = ScriptedConsole::new(&["1"]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::Snowflake, "T".to_string());

        let summary = ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        // 型の入力前に入力が終わった場合はデフォルト型として記録される
        assert_eq!(summary.get("ID"), Some(ColumnType::Integer));
    }

    #[test]
    fn test_presets_without_prompt() {
        let mut console = ScriptedConsole::new(&[]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::Snowflake, "T".to_string())
            .with_interactive(false)
            .with_type_overrides(vec!["sold on=date".to_string(), "PRICE=int".to_string()]);

        let summary = ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        assert_eq!(data.columns()[2].column_type, ColumnType::Date);
        assert_eq!(data.columns()[1].column_type, ColumnType::Integer);
        assert_eq!(summary.reviewed.len(), 2);
        assert!(!console.printed("Enter the column index"));
    }

    #[test]
    fn test_preset_unknown_column() {
        let mut console = ScriptedConsole::new(&[]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::Snowflake, "T".to_string())
            .with_interactive(false)
            .with_type_overrides(vec!["MISSING=int".to_string()]);

        let err = ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<SheetLoadError>(),
            Some(&SheetLoadError::UnknownColumn("MISSING".to_string()))
        );
    }

    #[test]
    fn test_preset_then_interactive_reset() {
        let mut console = ScriptedConsole::new(&["2", "", "exit"]);
        let mut data = create_test_data();
        let config = LoadConfig::new(Warehouse::Snowflake, "T".to_string())
            .with_type_overrides(vec!["PRICE=string".to_string()]);

        let summary = ResolveTypesUseCase::new(&mut console)
            .execute(&mut data, &config)
            .unwrap();

        // 空入力はデフォルト型に戻す
        assert_eq!(data.columns()[1].column_type, ColumnType::Float);
        assert_eq!(summary.get("PRICE"), Some(ColumnType::Float));
        assert_eq!(summary.reviewed.len(), 1);
    }
}
