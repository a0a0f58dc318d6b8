//! 配置加载器实现
//!
//! 从进程环境（可由 `.env` 文件预先填充）读取邮件配置

use crate::config::types::{EmailConfig, DEFAULT_SMTP_PORT};
use crate::error::ConfigError;
use std::path::Path;
use tracing::{debug, warn};

pub const ENV_EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const ENV_EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";

/// 环境变量配置加载器
pub struct EnvConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    lookup: F,
}

impl EnvConfigLoader<fn(&str) -> Option<String>> {
    /// 使用进程环境创建加载器
    pub fn from_process_env() -> Self {
        fn lookup(key: &str) -> Option<String> {
            std::env::var(key).ok()
        }
        Self { lookup }
    }
}

impl<F> EnvConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// 使用自定义查找函数创建加载器
    ///
    /// # 参数
    /// * `lookup` - 按变量名查找取值
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// 读取邮件配置
    pub fn load_email_config(&self) -> EmailConfig {
        EmailConfig {
            sender: self.non_empty(ENV_EMAIL_SENDER),
            password: self.non_empty(ENV_EMAIL_PASSWORD),
            receiver: self.non_empty(ENV_EMAIL_RECEIVER),
            smtp_server: self.non_empty(ENV_SMTP_SERVER),
            smtp_port: self.smtp_port(),
        }
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// 解析SMTP端口，缺失或无法解析时回退到587
    fn smtp_port(&self) -> u16 {
        match self.non_empty(ENV_SMTP_PORT) {
            None => DEFAULT_SMTP_PORT,
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!(
                    "{} 的值 '{}' 不是有效端口，使用默认值 {}",
                    ENV_SMTP_PORT, raw, DEFAULT_SMTP_PORT
                );
                DEFAULT_SMTP_PORT
            }),
        }
    }
}

/// 加载 `.env` 文件
///
/// 指定路径时文件必须存在；未指定时尝试当前目录，找不到不算错误。
///
/// # 参数
/// * `path` - 可选的环境文件路径
///
/// # 返回
/// * `Result<bool, ConfigError>` - 是否加载了文件
pub fn load_env_file(path: Option<&Path>) -> Result<bool, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::EnvFileError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            debug!("已加载环境文件: {}", path.display());
            Ok(true)
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                debug!("已加载环境文件: {}", found.display());
                Ok(true)
            }
            Err(e) if e.not_found() => Ok(false),
            Err(e) => Err(ConfigError::EnvFileError {
                path: ".env".to_string(),
                reason: e.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn loader_from(
        pairs: &[(&str, &str)],
    ) -> EnvConfigLoader<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfigLoader::new(move |key: &str| map.get(key).cloned())
    }

    #[test]
    fn test_load_full_email_config() {
        let loader = loader_from(&[
            ("EMAIL_SENDER", "monitor@example.com"),
            ("EMAIL_PASSWORD", "secret"),
            ("EMAIL_RECEIVER", "ops@example.com"),
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
        ]);

        let email = loader.load_email_config();
        assert_eq!(email.sender.as_deref(), Some("monitor@example.com"));
        assert_eq!(email.password.as_deref(), Some("secret"));
        assert_eq!(email.receiver.as_deref(), Some("ops@example.com"));
        assert_eq!(email.smtp_server.as_deref(), Some("smtp.example.com"));
        assert_eq!(email.smtp_port, 2525);
        assert!(email.is_complete());
    }

    #[test]
    fn test_port_defaults_when_absent() {
        let loader = loader_from(&[]);
        assert_eq!(loader.load_email_config().smtp_port, 587);
    }

    #[test]
    fn test_port_defaults_when_unparseable() {
        let loader = loader_from(&[("SMTP_PORT", "not-a-port")]);
        assert_eq!(loader.load_email_config().smtp_port, 587);

        let loader = loader_from(&[("SMTP_PORT", "70000")]);
        assert_eq!(loader.load_email_config().smtp_port, 587);
    }

    #[test]
    fn test_blank_values_are_treated_as_missing() {
        let loader = loader_from(&[("EMAIL_SENDER", "  "), ("SMTP_SERVER", "")]);
        let email = loader.load_email_config();
        assert!(email.sender.is_none());
        assert!(email.smtp_server.is_none());
    }

    #[test]
    #[serial]
    fn test_env_file_populates_process_env() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SITE_MONITOR_TEST_SENDER=from-file@example.com").unwrap();

        assert!(load_env_file(Some(file.path())).unwrap());
        assert_eq!(
            std::env::var("SITE_MONITOR_TEST_SENDER").unwrap(),
            "from-file@example.com"
        );
    }

    #[test]
    #[serial]
    fn test_explicit_missing_env_file_is_an_error() {
        let result = load_env_file(Some(Path::new("/nonexistent/site-monitor.env")));
        assert!(matches!(result, Err(ConfigError::EnvFileError { .. })));
    }

    #[test]
    #[serial]
    fn test_process_env_loader() {
        std::env::set_var("EMAIL_RECEIVER", "env@example.com");
        let email = EnvConfigLoader::from_process_env().load_email_config();
        assert_eq!(email.receiver.as_deref(), Some("env@example.com"));
        std::env::remove_var("EMAIL_RECEIVER");
    }
}
