//! # Operator Console Trait
//!
//! 対話的な型確認のための入出力を抽象化

use anyhow::Result;

/// オペレーターコンソール
pub trait OperatorConsole {
    /// 1行表示する
    fn show(&mut self, line: &str);

    /// プロンプトを表示して1行読み込む
    ///
    /// # Returns
    ///
    /// 入力行（末尾の改行は除く）。入力が終わっている場合は `None`
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}
