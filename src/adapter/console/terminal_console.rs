//! Terminal Console
//!
//! OperatorConsoleの標準入出力実装

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::domain::repositories::operator_console::OperatorConsole;

/// 入出力ストリームを使うコンソール
pub struct TerminalConsole<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl TerminalConsole<io::StdinLock<'static>, io::Stdout> {
    /// 標準入出力のコンソールを作成
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> OperatorConsole for TerminalConsole<R, W> {
    fn show(&mut self, line: &str) {
        // 表示の失敗で処理を止めない
        let _ = writeln!(self.output, "{}", line);
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read operator input")?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
