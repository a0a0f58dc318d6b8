//! 监控流水线
//!
//! 单次运行：读取目标 → 逐个探测 → 写入历史 → 判断 → 告警。
//! 目标严格按输入顺序处理，同一时间只处理一个。

use crate::core::targets::load_targets;
use crate::error::{Result, TargetSourceError};
use crate::health::{CheckResult, SiteProber};
use crate::notification::{AlertTemplate, NotificationSender};
use crate::storage::HistoryStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 一次完整运行的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 检测的目标数
    pub checked: usize,
    /// 状态码为200的目标数
    pub healthy: usize,
    /// 触发告警的目标数
    pub alerted: usize,
}

/// 运行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 所有目标都已处理
    Completed(RunSummary),
    /// 目标文件不存在，未做任何检测
    MissingTargets,
    /// 目标文件没有可用条目，未做任何检测
    EmptyTargets,
}

/// 监控流水线
pub struct MonitorPipeline {
    prober: Arc<dyn SiteProber>,
    store: HistoryStore,
    notifier: Arc<dyn NotificationSender>,
    template: AlertTemplate,
    request_timeout: Duration,
}

impl MonitorPipeline {
    /// 创建新的流水线
    ///
    /// # 参数
    /// * `prober` - 站点探测器
    /// * `store` - 已初始化的历史存储
    /// * `notifier` - 告警发送器
    /// * `template` - 告警模板
    /// * `request_timeout` - 每次探测的超时时间
    pub fn new(
        prober: Arc<dyn SiteProber>,
        store: HistoryStore,
        notifier: Arc<dyn NotificationSender>,
        template: AlertTemplate,
        request_timeout: Duration,
    ) -> Self {
        Self {
            prober,
            store,
            notifier,
            template,
            request_timeout,
        }
    }

    /// 执行一次完整的监控运行
    ///
    /// 目标文件缺失或为空时正常结束；存储错误会中止运行并向上传播。
    pub async fn run(&self, targets_path: &Path) -> Result<RunOutcome> {
        let targets = match load_targets(targets_path).await {
            Ok(targets) => targets,
            Err(TargetSourceError::NotFound { path }) => {
                error!(
                    "目标文件 '{}' 不存在，请创建该文件并填入要监控的URL",
                    path.display()
                );
                println!("Error: targets file '{}' was not found.", path.display());
                return Ok(RunOutcome::MissingTargets);
            }
            Err(TargetSourceError::Empty { path }) => {
                warn!("目标文件 '{}' 为空，没有需要监控的站点", path.display());
                println!(
                    "Warning: targets file '{}' is empty. No sites to monitor.",
                    path.display()
                );
                return Ok(RunOutcome::EmptyTargets);
            }
            Err(e) => return Err(e.into()),
        };

        info!("开始检测 {} 个站点", targets.len());
        println!("\n--- Starting site checks ---");

        let mut summary = RunSummary::default();
        for target in &targets {
            let result = self.process_target(target).await?;
            summary.checked += 1;
            if result.is_alert_worthy() {
                summary.alerted += 1;
            } else {
                summary.healthy += 1;
            }
        }

        info!(
            "站点检测完成: 共 {} 个，正常 {} 个，告警 {} 个",
            summary.checked, summary.healthy, summary.alerted
        );
        println!("--- Site checks finished ---");

        Ok(RunOutcome::Completed(summary))
    }

    /// 处理单个目标：探测、写入、判断、告警
    async fn process_target(&self, target: &str) -> Result<CheckResult> {
        let result = self
            .prober
            .check_with_timeout(target, self.request_timeout)
            .await;

        // 写入必须在告警判断之前完成
        self.store.record(&result).await?;

        let line = result.summary_line();
        println!("{}", line);
        info!("{}", line);

        if result.is_alert_worthy() {
            self.notify(&result).await;
        }

        Ok(result)
    }

    async fn notify(&self, result: &CheckResult) {
        match self.template.build_alert(result) {
            Ok(message) => self.notifier.send_alert(&message).await,
            Err(e) => error!("无法为 {} 生成告警消息: {}", result.target, e),
        }
    }
}
