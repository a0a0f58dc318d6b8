//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口。不带任何参数运行时执行一次完整检测。

use crate::config::types::{
    EmailConfig, MonitorConfig, DEFAULT_DATABASE_FILE, DEFAULT_LOG_FILE, DEFAULT_TARGETS_FILE,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Site Monitor - 周期性站点可用性检测工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "site-monitor",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 目标列表文件
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_TARGETS_FILE,
        help = "目标列表文件，每行一个URL",
        env = "MONITOR_TARGETS_FILE"
    )]
    pub targets: PathBuf,

    /// 历史数据库文件
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_DATABASE_FILE,
        help = "SQLite历史数据库文件",
        env = "MONITOR_DB_PATH"
    )]
    pub database: PathBuf,

    /// 日志文件
    #[arg(
        long,
        value_name = "FILE",
        default_value = DEFAULT_LOG_FILE,
        help = "日志文件（追加写入）",
        env = "MONITOR_LOG_FILE"
    )]
    pub log_file: PathBuf,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "MONITOR_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 请求超时时间（秒）
    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "5",
        help = "每次探测的超时时间（秒）",
        env = "MONITOR_TIMEOUT_SECS"
    )]
    pub timeout: u64,

    /// 环境文件
    #[arg(long, value_name = "FILE", help = "额外加载的 .env 文件")]
    pub env_file: Option<PathBuf>,

    /// 是否同时把日志输出到控制台
    #[arg(short, long, help = "同时把日志输出到控制台")]
    pub verbose: bool,

    /// 子命令，缺省为 run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// 当前要执行的子命令
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// 结合邮件配置生成运行配置
    pub fn to_config(&self, email: EmailConfig) -> MonitorConfig {
        MonitorConfig {
            targets_path: self.targets.clone(),
            database_path: self.database.clone(),
            log_file: self.log_file.clone(),
            request_timeout: Duration::from_secs(self.timeout),
            email,
        }
    }
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// 对目标列表执行一次检测
    Run,

    /// 查看最近的检测历史
    History {
        /// 显示条数
        #[arg(short = 'n', long, default_value = "20", help = "显示条数")]
        limit: u32,

        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 发送一封测试告警邮件
    TestNotification,
}

/// 输出格式
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}
