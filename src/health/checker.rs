//! HTTP健康检测器实现
//!
//! 对单个目标发起一次带超时的GET请求，并把结果归类为 `CheckResult`

use crate::error::HealthCheckError;
use crate::health::result::{CheckResult, ProbeFailure};
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response};
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// 默认请求超时时间
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// 站点探测器trait，定义检测接口
#[async_trait]
pub trait SiteProber: Send + Sync {
    /// 使用默认超时执行一次探测
    async fn check(&self, url: &str) -> CheckResult;

    /// 带超时的探测
    ///
    /// # 参数
    /// * `url` - 目标URL
    /// * `timeout_duration` - 超时时间
    ///
    /// # 返回
    /// * `CheckResult` - 探测结果，任何失败都会被归类而不是返回错误
    async fn check_with_timeout(&self, url: &str, timeout_duration: Duration) -> CheckResult;
}

/// HTTP探测器实现
pub struct HttpProber {
    /// HTTP客户端
    client: Client,
    /// 默认超时时间
    default_timeout: Duration,
}

impl HttpProber {
    /// 创建新的HTTP探测器
    ///
    /// # 参数
    /// * `timeout` - 默认超时时间
    ///
    /// # 返回
    /// * `Result<Self, HealthCheckError>` - 探测器实例
    pub fn new(timeout: Duration) -> Result<Self, HealthCheckError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// 根据状态码归类响应
    fn classify_response(url: &str, response: &Response) -> CheckResult {
        let status = response.status();
        if status.is_success() {
            CheckResult::ok(url, status.as_u16())
        } else {
            CheckResult::http_error(url, status.as_u16(), &reason_phrase(response))
        }
    }

    /// 把请求错误归类为探测失败
    fn classify_error(error: &reqwest::Error) -> ProbeFailure {
        if error.is_timeout() {
            ProbeFailure::Timeout
        } else if is_tls_failure(error) {
            // TLS失败在reqwest中同样表现为连接错误，需要先判断
            ProbeFailure::Ssl
        } else if error.is_connect() {
            ProbeFailure::Connection
        } else {
            ProbeFailure::Unexpected(error_chain_message(error))
        }
    }
}

#[async_trait]
impl SiteProber for HttpProber {
    async fn check(&self, url: &str) -> CheckResult {
        self.check_with_timeout(url, self.default_timeout).await
    }

    async fn check_with_timeout(&self, url: &str, timeout_duration: Duration) -> CheckResult {
        debug!("探测目标: {} (超时 {:?})", url, timeout_duration);

        let request = self.client.get(url).timeout(timeout_duration).send();

        match timeout(timeout_duration, request).await {
            Ok(Ok(response)) => Self::classify_response(url, &response),
            Ok(Err(e)) => {
                debug!("请求失败: {}: {}", url, error_chain_message(&e));
                CheckResult::failure(url, Self::classify_error(&e))
            }
            Err(_) => CheckResult::failure(url, ProbeFailure::Timeout),
        }
    }
}

/// 服务器实际返回的原因短语
///
/// hyper 只在短语与标准短语不同时才把它放进扩展里，其余情况使用标准短语。
fn reason_phrase(response: &Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// 沿错误链查找TLS相关的错误
///
/// 优先按类型识别 rustls 错误（直接出现或包在 `io::Error` 里），
/// 找不到时再按描述文字兜底。顶层错误的描述里带有请求URL，不参与判断。
pub(crate) fn is_tls_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut current = error.source();
    while let Some(err) = current {
        if is_rustls_error(err) || mentions_tls(&err.to_string()) {
            return true;
        }
        current = err.source();
    }
    false
}

fn is_rustls_error(error: &(dyn StdError + 'static)) -> bool {
    if error.downcast_ref::<rustls::Error>().is_some() {
        return true;
    }
    error
        .downcast_ref::<io::Error>()
        .and_then(|io_error| io_error.get_ref())
        .is_some_and(|inner| inner.downcast_ref::<rustls::Error>().is_some())
}

fn mentions_tls(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("certificate")
        || text.contains("tls")
        || text.contains("ssl")
        || text.contains("handshake")
}

/// 把错误链拼成一行，reqwest 顶层错误通常不包含根因
fn error_chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        let text = err.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        current = err.source();
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// 接受一个连接，读取请求后原样写回给定的响应字节
    async fn serve_raw_once(response: &'static str) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        port
    }

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "error trying to connect")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_tls_failure_detected_in_source_chain() {
        let err = Wrapped(io::Error::new(
            io::ErrorKind::InvalidData,
            "invalid peer certificate: UnknownIssuer",
        ));
        assert!(is_tls_failure(&err));
        assert_eq!(
            error_chain_message(&err),
            "error trying to connect: invalid peer certificate: UnknownIssuer"
        );
    }

    #[test]
    fn test_rustls_error_inside_io_error_is_tls() {
        // 描述里没有任何TLS关键字，只能按类型识别
        let rustls_error = rustls::Error::InvalidMessage(rustls::InvalidMessage::InvalidContentType);
        let err = Wrapped(io::Error::new(io::ErrorKind::InvalidData, rustls_error));
        assert!(!mentions_tls(&err.0.to_string()));
        assert!(is_tls_failure(&err));
    }

    #[tokio::test]
    async fn test_https_against_plain_http_server_is_ssl_error() {
        let port = serve_raw_once("HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n").await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&format!("https://127.0.0.1:{}/", port)).await;

        assert_eq!(result.status_code, None);
        assert_eq!(result.status_text, "SSL Error: certificate problem");
    }

    #[tokio::test]
    async fn test_custom_reason_phrase_is_kept() {
        let port = serve_raw_once(
            "HTTP/1.1 503 Down For Maintenance\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&format!("http://127.0.0.1:{}/", port)).await;

        assert_eq!(result.status_code, Some(503));
        assert_eq!(result.status_text, "HTTP Error: 503 - Down For Maintenance");
    }

    #[tokio::test]
    async fn test_non_standard_code_keeps_its_phrase() {
        let port = serve_raw_once(
            "HTTP/1.1 599 Network Timeout\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&format!("http://127.0.0.1:{}/", port)).await;

        assert_eq!(result.status_code, Some(599));
        assert_eq!(result.status_text, "HTTP Error: 599 - Network Timeout");
    }

    #[test]
    fn test_connection_refused_is_not_tls() {
        let err = Wrapped(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "Connection refused (os error 111)",
        ));
        assert!(!is_tls_failure(&err));
    }

    #[tokio::test]
    async fn test_ok_response() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/health")
            .with_status(200)
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let url = format!("{}/health", server.url());
        let result = prober.check(&url).await;

        assert_eq!(result.target, url);
        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.status_text, "OK");
    }

    #[tokio::test]
    async fn test_other_success_codes_are_ok() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/created")
            .with_status(201)
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&format!("{}/created", server.url())).await;

        assert_eq!(result.status_code, Some(201));
        assert_eq!(result.status_text, "OK");
        assert!(result.is_alert_worthy());
    }

    #[tokio::test]
    async fn test_not_found_is_classified() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&format!("{}/missing", server.url())).await;

        assert_eq!(result.status_code, Some(404));
        assert_eq!(result.status_text, "HTTP Error: 404 - Not Found");
    }

    #[tokio::test]
    async fn test_server_error_is_classified() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&server.url()).await;

        assert_eq!(result.status_code, Some(500));
        assert_eq!(result.status_text, "HTTP Error: 500 - Internal Server Error");
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/moved")
            .with_status(301)
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&format!("{}/moved", server.url())).await;

        assert_eq!(result.status_code, Some(301));
        assert_eq!(result.status_text, "HTTP Error: 301 - Moved Permanently");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // 绑定后立即释放端口，保证没有进程在监听
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check(&format!("http://127.0.0.1:{}/", port)).await;

        assert_eq!(result.status_code, None);
        assert_eq!(result.status_text, "Connection Error: unable to connect");
    }

    #[tokio::test]
    async fn test_timeout() {
        // 监听但从不应答
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober
            .check_with_timeout(
                &format!("http://127.0.0.1:{}/", port),
                Duration::from_millis(300),
            )
            .await;

        assert_eq!(result.status_code, None);
        assert_eq!(result.status_text, "Timeout: no response within the time limit");
        drop(listener);
    }

    #[tokio::test]
    async fn test_invalid_url_is_unexpected() {
        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.check("not a url").await;

        assert_eq!(result.status_code, None);
        assert!(result.status_text.starts_with("Unexpected Error: "));
    }
}
