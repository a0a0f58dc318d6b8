//! 通知模块
//!
//! 提供邮件告警和消息模板功能

pub mod email;
pub mod sender;
pub mod template;

// 重新导出主要类型
pub use email::EmailSender;
pub use sender::{AlertMessage, NoOpSender, NotificationSender};
pub use template::{AlertTemplate, TemplateContext};
