//! 通知发送器模块
//!
//! 定义通知发送的trait和基础实现

use async_trait::async_trait;

/// 告警消息
///
/// 只在需要告警时构建，发送尝试后即丢弃。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// 邮件主题
    pub subject: String,
    /// HTML正文
    pub html_body: String,
}

impl AlertMessage {
    pub fn new(subject: impl Into<String>, html_body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

/// 通知发送器trait
///
/// 发送失败只记录日志，不会传播给调用方。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送告警
    ///
    /// # 参数
    /// * `message` - 告警消息
    async fn send_alert(&self, message: &AlertMessage);
}

/// 空的通知发送器实现（用于测试或禁用通知）
pub struct NoOpSender;

#[async_trait]
impl NotificationSender for NoOpSender {
    async fn send_alert(&self, _message: &AlertMessage) {
        // 不执行任何操作
    }
}
