//! 历史记录数据结构

use serde::Serialize;

/// 持久化的一次检测记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct HistoryRecord {
    /// 自增主键
    pub id_site: i64,
    /// 被检测的URL
    pub site: String,
    /// HTTP状态码，连接层失败时为空
    pub status_code: Option<i64>,
    /// 状态描述
    pub status_text: String,
    /// 写入时间（ISO-8601，本地时间）
    pub data_hora: String,
}

impl HistoryRecord {
    /// 状态码的展示形式
    pub fn status_code_display(&self) -> String {
        self.status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| crate::health::result::STATUS_CODE_PLACEHOLDER.to_string())
    }
}
