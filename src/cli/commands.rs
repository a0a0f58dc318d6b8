//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::OutputFormat;
use crate::config::MonitorConfig;
use crate::core::{MonitorPipeline, RunOutcome};
use crate::error::Result;
use crate::health::HttpProber;
use crate::notification::template::ALERT_TIME_FORMAT;
use crate::notification::{AlertMessage, AlertTemplate, EmailSender};
use crate::storage::{HistoryRecord, HistoryStore};
use async_trait::async_trait;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, config: &MonitorConfig) -> Result<()>;
}

/// 执行一次检测
pub struct RunCommand;

impl RunCommand {
    /// 执行检测并返回运行结果
    pub async fn run(&self, config: &MonitorConfig) -> Result<RunOutcome> {
        let store = HistoryStore::open(&config.database_path).await?;
        store.initialize().await?;

        if !config.email.is_complete() {
            warn!(
                "邮件配置不完整（缺少: {}），本次运行不会发送告警",
                config.email.missing_fields().join(", ")
            );
        }

        let pipeline = MonitorPipeline::new(
            Arc::new(HttpProber::new(config.request_timeout)?),
            store.clone(),
            Arc::new(EmailSender::new(config.email.clone())),
            AlertTemplate::new()?,
            config.request_timeout,
        );

        let outcome = pipeline.run(&config.targets_path).await;
        store.close().await;
        outcome
    }
}

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, config: &MonitorConfig) -> Result<()> {
        self.run(config).await.map(|_| ())
    }
}

/// 查看检测历史
pub struct HistoryCommand {
    /// 显示条数
    pub limit: u32,
    /// 输出格式
    pub format: OutputFormat,
}

#[async_trait]
impl Command for HistoryCommand {
    async fn execute(&self, config: &MonitorConfig) -> Result<()> {
        let store = HistoryStore::open(&config.database_path).await?;
        store.initialize().await?;
        debug!(
            "读取 {} 中最近 {} 条记录",
            store.path().display(),
            self.limit
        );
        let records = store.recent(self.limit).await?;
        store.close().await;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            OutputFormat::Text => {
                if records.is_empty() {
                    println!("暂无检测记录");
                }
                for record in &records {
                    println!("{}", format_record(record));
                }
            }
        }
        Ok(())
    }
}

/// 历史记录的单行文本形式
pub fn format_record(record: &HistoryRecord) -> String {
    format!(
        "#{} {} [{}] -> {} | {}",
        record.id_site,
        record.data_hora,
        record.site,
        record.status_code_display(),
        record.status_text
    )
}

/// 发送测试告警
pub struct TestNotificationCommand;

#[async_trait]
impl Command for TestNotificationCommand {
    async fn execute(&self, config: &MonitorConfig) -> Result<()> {
        let message = AlertMessage::new(
            format!("{} test notification", crate::APP_NAME),
            format!(
                "<html><body><p>This is a test message from {} v{}.</p><p><b>Time:</b> {}</p></body></html>",
                crate::APP_NAME,
                crate::VERSION,
                Local::now().format(ALERT_TIME_FORMAT)
            ),
        );

        EmailSender::new(config.email.clone())
            .deliver(&message)
            .await?;

        info!("测试邮件发送成功");
        println!("Test notification sent successfully.");
        Ok(())
    }
}
