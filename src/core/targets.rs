//! 目标列表读取

use crate::error::TargetSourceError;
use std::io::ErrorKind;
use std::path::Path;

/// 解析目标列表内容：每行一个URL，去掉首尾空白，忽略空行
pub fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 从文件读取目标列表
///
/// # 返回
/// * `Ok(Vec<String>)` - 至少包含一个目标
/// * `Err(TargetSourceError::NotFound)` - 文件不存在
/// * `Err(TargetSourceError::Empty)` - 没有可用条目
pub async fn load_targets(path: &Path) -> Result<Vec<String>, TargetSourceError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(TargetSourceError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(TargetSourceError::Io(e)),
    };

    let targets = parse_targets(&content);
    if targets.is_empty() {
        return Err(TargetSourceError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(targets)
}
