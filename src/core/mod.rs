//! 核心模块
//!
//! 目标读取和监控流水线

pub mod pipeline;
pub mod targets;

pub use pipeline::{MonitorPipeline, RunOutcome, RunSummary};
pub use targets::{load_targets, parse_targets};
