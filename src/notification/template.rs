//! 告警消息模板模块
//!
//! 使用Handlebars渲染告警邮件的HTML正文

use crate::error::NotificationError;
use crate::health::CheckResult;
use crate::notification::sender::AlertMessage;
use handlebars::Handlebars;
use serde::Serialize;

const ALERT_TEMPLATE_NAME: &str = "alert";

/// 告警时间的展示格式
pub const ALERT_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// 模板上下文数据
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// 目标URL
    pub target: String,
    /// HTTP状态码或占位符
    pub status_code: String,
    /// 状态描述
    pub status_text: String,
    /// 检测时间
    pub timestamp: String,
}

impl From<&CheckResult> for TemplateContext {
    fn from(result: &CheckResult) -> Self {
        Self {
            target: result.target.clone(),
            status_code: result.status_code_display(),
            status_text: result.status_text.clone(),
            timestamp: result.timestamp.format(ALERT_TIME_FORMAT).to_string(),
        }
    }
}

/// 告警模板
pub struct AlertTemplate {
    registry: Handlebars<'static>,
}

impl AlertTemplate {
    /// 使用默认模板创建
    pub fn new() -> Result<Self, NotificationError> {
        Self::with_template(&default_alert_template())
    }

    /// 使用自定义HTML模板创建
    ///
    /// # 参数
    /// * `template` - Handlebars模板字符串
    pub fn with_template(template: &str) -> Result<Self, NotificationError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(ALERT_TEMPLATE_NAME, template)
            .map_err(|e| NotificationError::Template(e.to_string()))?;
        Ok(Self { registry })
    }

    /// 渲染HTML正文，变量值会被HTML转义
    pub fn render(&self, context: &TemplateContext) -> Result<String, NotificationError> {
        self.registry
            .render(ALERT_TEMPLATE_NAME, context)
            .map_err(|e| NotificationError::Template(e.to_string()))
    }

    /// 为一次检测结果构建完整的告警消息
    pub fn build_alert(&self, result: &CheckResult) -> Result<AlertMessage, NotificationError> {
        let context = TemplateContext::from(result);
        let html_body = self.render(&context)?;
        Ok(AlertMessage::new(alert_subject(&result.target), html_body))
    }
}

/// 告警邮件主题
pub fn alert_subject(target: &str) -> String {
    format!("ALERT: problem with site {}", target)
}

/// 默认的告警消息模板
pub fn default_alert_template() -> String {
    r#"<html>
<body>
    <p><b>ALERT!</b> The site <a href="{{target}}">{{target}}</a> is having problems!</p>
    <p><b>Status:</b> {{status_code}}</p>
    <p><b>Details:</b> <i>{{status_text}}</i></p>
    <p><b>Time:</b> {{timestamp}}</p>
</body>
</html>
"#
    .to_string()
}
