//! 存储模块
//!
//! 提供检测历史的持久化和读取

pub mod record;
pub mod store;

// 重新导出主要类型
pub use record::HistoryRecord;
pub use store::{HistoryStore, HISTORY_TABLE};
