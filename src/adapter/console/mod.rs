//! Console Adapters
//!
//! オペレーターとの対話と進捗表示

pub mod progress;
pub mod terminal_console;
