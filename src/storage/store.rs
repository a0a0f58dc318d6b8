//! 检测历史存储
//!
//! 基于SQLite的追加式历史表。整个运行期间只持有一个连接，
//! 每次插入都会在返回前提交，保证告警判断发生在写入之后。

use crate::error::StorageError;
use crate::health::CheckResult;
use crate::storage::record::HistoryRecord;
use chrono::Local;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

/// 历史表名
pub const HISTORY_TABLE: &str = "monitoramento_sites";

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS monitoramento_sites (
        id_site INTEGER PRIMARY KEY AUTOINCREMENT,
        site TEXT NOT NULL,
        status_code INTEGER,
        status_text TEXT NOT NULL,
        data_hora TEXT NOT NULL
    )";

/// 写入时间格式，与 ISO-8601 本地时间一致
const INSERT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// 检测历史存储
#[derive(Debug, Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl HistoryStore {
    /// 打开（必要时创建）数据库文件
    ///
    /// # 参数
    /// * `path` - 数据库文件路径
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|source| StorageError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self { pool, path })
    }

    /// 数据库文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 创建历史表（已存在时不做任何事）
    pub async fn initialize(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        info!(
            "数据库 '{}' 和表 '{}' 已检查/创建",
            self.path.display(),
            HISTORY_TABLE
        );
        Ok(())
    }

    /// 追加一条检测记录
    ///
    /// # 返回
    /// * `Result<i64, StorageError>` - 新记录的ID
    pub async fn record(&self, result: &CheckResult) -> Result<i64, StorageError> {
        let data_hora = Local::now().format(INSERT_TIMESTAMP_FORMAT).to_string();

        let outcome = sqlx::query(
            "INSERT INTO monitoramento_sites (site, status_code, status_text, data_hora)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&result.target)
        .bind(result.status_code.map(i64::from))
        .bind(&result.status_text)
        .bind(&data_hora)
        .execute(&self.pool)
        .await?;

        info!(
            "状态已写入数据库: [{}] -> {} | {}",
            result.target,
            result.status_code_display(),
            result.status_text
        );

        Ok(outcome.last_insert_rowid())
    }

    /// 读取最近的记录，按ID倒序
    pub async fn recent(&self, limit: u32) -> Result<Vec<HistoryRecord>, StorageError> {
        let records = sqlx::query_as::<_, HistoryRecord>(
            "SELECT id_site, site, status_code, status_text, data_hora
             FROM monitoramento_sites
             ORDER BY id_site DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// 记录总数
    pub async fn count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM monitoramento_sites")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// 关闭连接
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
