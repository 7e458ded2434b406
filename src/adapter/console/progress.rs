//! Progress Display
//!
//! indicatifによる進捗表示

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠸", "⠴", "⠦", "⠇", "✓"];

/// メッセージ付きのスピナーを作成
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style.tick_strings(SPINNER_TICKS));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
