//! 健康检测结果数据结构
//!
//! 定义单次探测的结果类型和失败分类

use chrono::{DateTime, Local};
use serde::Serialize;

/// 成功响应的状态文本
pub const STATUS_OK: &str = "OK";

/// 状态码缺失时在输出中使用的占位符
pub const STATUS_CODE_PLACEHOLDER: &str = "N/A";

/// 没有得到HTTP响应时的失败分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// TLS握手或证书校验失败
    Ssl,
    /// 连接被拒绝、不可达或DNS解析失败
    Connection,
    /// 超过时间限制
    Timeout,
    /// 其他意外错误
    Unexpected(String),
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeFailure::Ssl => write!(f, "SSL Error: certificate problem"),
            ProbeFailure::Connection => write!(f, "Connection Error: unable to connect"),
            ProbeFailure::Timeout => write!(f, "Timeout: no response within the time limit"),
            ProbeFailure::Unexpected(details) => write!(f, "Unexpected Error: {}", details),
        }
    }
}

/// 单次探测结果
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// 被检测的URL
    pub target: String,
    /// HTTP状态码，只有拿到响应时才存在
    pub status_code: Option<u16>,
    /// 状态描述
    pub status_text: String,
    /// 检测时间
    pub timestamp: DateTime<Local>,
}

impl CheckResult {
    /// 2xx 响应
    pub fn ok(target: impl Into<String>, status_code: u16) -> Self {
        Self::new(target.into(), Some(status_code), STATUS_OK.to_string())
    }

    /// 非 2xx 响应
    ///
    /// # 参数
    /// * `target` - 目标URL
    /// * `status_code` - 实际状态码
    /// * `reason` - 状态码对应的原因短语
    pub fn http_error(target: impl Into<String>, status_code: u16, reason: &str) -> Self {
        Self::new(
            target.into(),
            Some(status_code),
            format!("HTTP Error: {} - {}", status_code, reason),
        )
    }

    /// 没有拿到响应的失败
    pub fn failure(target: impl Into<String>, failure: ProbeFailure) -> Self {
        Self::new(target.into(), None, failure.to_string())
    }

    fn new(target: String, status_code: Option<u16>, status_text: String) -> Self {
        Self {
            target,
            status_code,
            status_text,
            timestamp: Local::now(),
        }
    }

    /// 是否需要告警
    ///
    /// 只有状态码恰好为200才算正常，201/204/301等同样触发告警。
    pub fn is_alert_worthy(&self) -> bool {
        self.status_code != Some(200)
    }

    /// 状态码的展示形式
    pub fn status_code_display(&self) -> String {
        self.status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| STATUS_CODE_PLACEHOLDER.to_string())
    }

    /// 控制台与日志共用的单行摘要
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] -> {} | {}",
            self.target,
            self.status_code_display(),
            self.status_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_failure_display() {
        assert_eq!(
            ProbeFailure::Ssl.to_string(),
            "SSL Error: certificate problem"
        );
        assert_eq!(
            ProbeFailure::Connection.to_string(),
            "Connection Error: unable to connect"
        );
        assert_eq!(
            ProbeFailure::Timeout.to_string(),
            "Timeout: no response within the time limit"
        );
        assert_eq!(
            ProbeFailure::Unexpected("boom".to_string()).to_string(),
            "Unexpected Error: boom"
        );
    }

    #[test]
    fn test_ok_result() {
        let result = CheckResult::ok("https://example.com", 200);
        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.status_text, "OK");
        assert!(!result.is_alert_worthy());
    }

    #[test]
    fn test_http_error_result() {
        let result = CheckResult::http_error("https://example.com/missing", 404, "Not Found");
        assert_eq!(result.status_code, Some(404));
        assert_eq!(result.status_text, "HTTP Error: 404 - Not Found");
        assert!(result.is_alert_worthy());
    }

    #[test]
    fn test_alert_policy_is_exact_match_on_200() {
        // 其他2xx同样告警
        assert!(CheckResult::ok("https://example.com", 201).is_alert_worthy());
        assert!(CheckResult::ok("https://example.com", 204).is_alert_worthy());
        assert!(CheckResult::http_error("https://example.com", 301, "Moved Permanently")
            .is_alert_worthy());
        assert!(CheckResult::failure("https://example.com", ProbeFailure::Timeout)
            .is_alert_worthy());
    }

    #[test]
    fn test_summary_line() {
        let ok = CheckResult::ok("https://example.com", 200);
        assert_eq!(ok.summary_line(), "[https://example.com] -> 200 | OK");

        let down = CheckResult::failure("https://down.invalid", ProbeFailure::Connection);
        assert_eq!(
            down.summary_line(),
            "[https://down.invalid] -> N/A | Connection Error: unable to connect"
        );
    }
}
