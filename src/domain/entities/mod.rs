//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **CellValue**: セル値
//! - **Column**: 列定義（推論型とウェアハウス型）
//! - **SheetData**: 列と行からなる表
//! - **StagedFile**: ロード元のステージングファイル
//! - **TableDefinition**: ロード先テーブル定義
//! - **Warehouse**: ロード先ウェアハウスの種類

pub mod cell;
pub mod column;
pub mod sheet_data;
pub mod staged_file;
pub mod table_definition;
pub mod warehouse;
