//! 邮件通知发送器模块
//!
//! 通过SMTP+STARTTLS发送告警邮件

use crate::config::EmailConfig;
use crate::error::NotificationError;
use crate::notification::sender::{AlertMessage, NotificationSender};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::{Category, Severity};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, error, info};

/// SMTP会话超时时间
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// 已通过前置检查的SMTP参数
struct SmtpSettings<'a> {
    sender: &'a str,
    password: &'a str,
    receiver: &'a str,
    server: &'a str,
    port: u16,
}

/// 邮件通知发送器
pub struct EmailSender {
    /// 邮件配置
    config: EmailConfig,
}

impl EmailSender {
    /// 创建新的邮件发送器
    ///
    /// # 参数
    /// * `config` - 邮件配置，缺失的字段在发送时检查
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// 检查发送前置条件
    fn settings(&self) -> Result<SmtpSettings<'_>, NotificationError> {
        let missing = self.config.missing_fields();
        if !missing.is_empty() {
            return Err(NotificationError::MissingCredentials { fields: missing });
        }

        // missing_fields 为空时各字段都存在
        match (
            self.config.sender.as_deref(),
            self.config.password.as_deref(),
            self.config.receiver.as_deref(),
            self.config.smtp_server.as_deref(),
        ) {
            (Some(sender), Some(password), Some(receiver), Some(server)) => Ok(SmtpSettings {
                sender,
                password,
                receiver,
                server,
                port: self.config.smtp_port,
            }),
            _ => Err(NotificationError::MissingCredentials {
                fields: self.config.missing_fields(),
            }),
        }
    }

    /// 构建 multipart/alternative 邮件
    fn build_message(
        settings: &SmtpSettings<'_>,
        message: &AlertMessage,
    ) -> Result<Message, NotificationError> {
        let from: Mailbox = settings
            .sender
            .parse()
            .map_err(|e| NotificationError::Send(format!("发件人地址无效: {}", e)))?;
        let to: Mailbox = settings
            .receiver
            .parse()
            .map_err(|e| NotificationError::Send(format!("收件人地址无效: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .multipart(
                MultiPart::alternative().singlepart(SinglePart::html(message.html_body.clone())),
            )
            .map_err(|e| NotificationError::Send(format!("构建邮件失败: {}", e)))
    }

    /// 发送邮件并返回分类后的错误
    ///
    /// 凭据不完整时直接返回，不会建立任何连接。
    pub async fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError> {
        let settings = self.settings()?;
        let email = Self::build_message(&settings, message)?;

        debug!(
            "连接SMTP服务器 {}:{} (STARTTLS)",
            settings.server, settings.port
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(settings.server)
            .map_err(|e| classify_smtp_error(&e))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.sender.to_string(),
                settings.password.to_string(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        transport
            .send(email)
            .await
            .map_err(|e| classify_smtp_error(&e))?;

        info!(
            "告警邮件已发送: '{}' -> {}",
            message.subject, settings.receiver
        );
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for EmailSender {
    async fn send_alert(&self, message: &AlertMessage) {
        match self.deliver(message).await {
            Ok(()) => {}
            Err(NotificationError::MissingCredentials { fields }) => {
                error!(
                    "邮件凭据未正确配置（缺少: {}），告警未发送",
                    fields.join(", ")
                );
            }
            Err(NotificationError::Authentication(reason)) => {
                error!("SMTP认证失败: {}，请检查发件人地址和应用密码", reason);
            }
            Err(NotificationError::Connection(reason)) => {
                error!("SMTP连接失败: {}，请检查SMTP服务器和端口", reason);
            }
            Err(e) => {
                error!("发送告警邮件时出现意外错误: {}", e);
            }
        }
    }
}

/// 将SMTP错误归类为认证、连接或其他失败
fn classify_smtp_error(error: &lettre::transport::smtp::Error) -> NotificationError {
    let reason = error.to_string();

    if let Some(code) = error.status() {
        // 53x: 认证相关的永久性拒绝
        if code.severity == Severity::PermanentNegativeCompletion
            && code.category == Category::Unspecified3
        {
            return NotificationError::Authentication(reason);
        }
        return NotificationError::Send(reason);
    }

    if error.is_timeout() || (!error.is_client() && !error.is_response()) {
        NotificationError::Connection(reason)
    } else {
        NotificationError::Send(reason)
    }
}
