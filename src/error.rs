//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use std::path::PathBuf;
use thiserror::Error;

/// Site Monitor 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum MonitorError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 健康检测相关错误
    #[error("健康检测错误: {0}")]
    HealthCheck(#[from] HealthCheckError),

    /// 历史记录存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// 目标列表错误
    #[error("目标列表错误: {0}")]
    TargetSource(#[from] TargetSourceError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 环境文件加载失败
    #[error("环境文件加载失败: {path}: {reason}")]
    EnvFileError { path: String, reason: String },
}

/// 健康检测错误类型
///
/// 探测本身的失败都会被归类为 `CheckResult`，这里只剩下无法构建客户端的情况。
#[derive(Error, Debug)]
pub enum HealthCheckError {
    /// HTTP客户端构建失败
    #[error("HTTP客户端构建失败: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// 无法打开数据库文件
    #[error("无法打开数据库 {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    /// SQL执行失败
    #[error("SQL执行失败: {0}")]
    Query(#[from] sqlx::Error),
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 邮件凭据不完整
    #[error("邮件凭据未正确配置，缺少: {}", fields.join(", "))]
    MissingCredentials { fields: Vec<&'static str> },

    /// SMTP认证被拒绝
    #[error("SMTP认证失败: {0}")]
    Authentication(String),

    /// 无法连接到SMTP服务器
    #[error("SMTP连接失败: {0}")]
    Connection(String),

    /// 模板渲染错误
    #[error("模板渲染失败: {0}")]
    Template(String),

    /// 其他发送失败
    #[error("邮件发送失败: {0}")]
    Send(String),
}

/// 目标列表读取错误
#[derive(Error, Debug)]
pub enum TargetSourceError {
    /// 目标文件不存在
    #[error("目标文件不存在: {}", path.display())]
    NotFound { path: PathBuf },

    /// 目标文件中没有可用条目
    #[error("目标文件为空: {}", path.display())]
    Empty { path: PathBuf },

    /// 读取失败
    #[error("读取目标文件失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, MonitorError>;
