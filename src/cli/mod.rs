//! CLI模块
//!
//! 处理命令行参数解析和命令执行

pub mod args;
pub mod commands;

// 重新导出主要类型
pub use args::{Args, Commands, LogLevel, OutputFormat};
pub use commands::{Command, HistoryCommand, RunCommand, TestNotificationCommand};
