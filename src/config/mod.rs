//! 配置管理模块
//!
//! 提供运行配置和邮件凭据的加载与验证

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{load_env_file, EnvConfigLoader};
pub use types::{validate_config, EmailConfig, MonitorConfig};
