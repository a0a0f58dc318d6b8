//! 健康检测模块
//!
//! 提供HTTP探测和结果分类功能

pub mod checker;
pub mod result;

// 重新导出主要类型
pub use checker::{HttpProber, SiteProber, DEFAULT_TIMEOUT};
pub use result::{CheckResult, ProbeFailure};
