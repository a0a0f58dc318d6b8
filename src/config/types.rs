//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use std::path::PathBuf;
use std::time::Duration;

/// 默认目标列表文件
pub const DEFAULT_TARGETS_FILE: &str = "sites.txt";
/// 默认数据库文件
pub const DEFAULT_DATABASE_FILE: &str = "monitor.db";
/// 默认日志文件
pub const DEFAULT_LOG_FILE: &str = "monitor_sites.log";
/// 默认SMTP端口（STARTTLS）
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// 运行配置，启动时加载一次，之后只读
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// 目标列表文件
    pub targets_path: PathBuf,
    /// 历史数据库文件
    pub database_path: PathBuf,
    /// 日志文件
    pub log_file: PathBuf,
    /// 每次探测的超时时间
    pub request_timeout: Duration,
    /// 告警邮件配置
    pub email: EmailConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            targets_path: PathBuf::from(DEFAULT_TARGETS_FILE),
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            request_timeout: crate::health::DEFAULT_TIMEOUT,
            email: EmailConfig::default(),
        }
    }
}

/// 告警邮件配置
///
/// 字段允许缺失，发送前由 [`EmailConfig::missing_fields`] 检查。
#[derive(Clone, PartialEq)]
pub struct EmailConfig {
    /// 发件人地址
    pub sender: Option<String>,
    /// 发件人凭据（应用专用密码）
    pub password: Option<String>,
    /// 收件人地址
    pub receiver: Option<String>,
    /// SMTP服务器
    pub smtp_server: Option<String>,
    /// SMTP端口
    pub smtp_port: u16,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender: None,
            password: None,
            receiver: None,
            smtp_server: None,
            smtp_port: DEFAULT_SMTP_PORT,
        }
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("receiver", &self.receiver)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

impl EmailConfig {
    /// 列出缺失或为空的字段，使用环境变量名
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        if blank(&self.sender) {
            missing.push(crate::config::loader::ENV_EMAIL_SENDER);
        }
        if blank(&self.password) {
            missing.push(crate::config::loader::ENV_EMAIL_PASSWORD);
        }
        if blank(&self.receiver) {
            missing.push(crate::config::loader::ENV_EMAIL_RECEIVER);
        }
        if blank(&self.smtp_server) {
            missing.push(crate::config::loader::ENV_SMTP_SERVER);
        }
        if self.smtp_port == 0 {
            missing.push(crate::config::loader::ENV_SMTP_PORT);
        }
        missing
    }

    /// 是否可以发送邮件
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &MonitorConfig) -> Result<(), String> {
    if config.request_timeout.is_zero() {
        return Err("请求超时时间不能为0".to_string());
    }

    if config.targets_path.as_os_str().is_empty() {
        return Err("目标列表文件路径不能为空".to_string());
    }

    if config.database_path.as_os_str().is_empty() {
        return Err("数据库文件路径不能为空".to_string());
    }

    Ok(())
}
