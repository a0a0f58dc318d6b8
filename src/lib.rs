//! Site Monitor - 周期性站点可用性检测工具
//!
//! 每次运行对目标列表做一次顺序检测：
//! - HTTP/HTTPS探测并归类结果
//! - 检测历史写入SQLite
//! - 状态码不为200时发送邮件告警
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;
pub mod storage;


// 重新导出主要类型
pub use config::{EmailConfig, MonitorConfig};
pub use crate::core::{MonitorPipeline, RunOutcome, RunSummary};
pub use error::MonitorError;
pub use health::{CheckResult, HttpProber, SiteProber};
pub use storage::{HistoryRecord, HistoryStore};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
