//! Scratch Storage Port - 请求级临时文件
//!
//! 每次点歌请求独占一个以请求 ID 命名的目录，源音频、中间 PCM、silk 都放在里面。
//! 目录由 [`ScratchLease`] 持有，正常路径调用 `release`，
//! 任何提前返回或任务取消都由 Drop 兜底删除。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// 临时存储错误
#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("IO error: {0}")]
    Io(String),
}

/// 临时存储统计
#[derive(Debug, Clone, Default)]
pub struct ScratchStats {
    /// 请求目录数量
    pub workspace_count: u64,
    /// 文件数量
    pub file_count: u64,
    /// 已使用空间（字节）
    pub used_bytes: u64,
}

/// 单个请求的临时目录租约
#[derive(Debug)]
pub struct ScratchLease {
    request_id: Uuid,
    dir: PathBuf,
    released: bool,
}

impl ScratchLease {
    pub fn new(request_id: Uuid, dir: PathBuf) -> Self {
        Self {
            request_id,
            dir,
            released: false,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 租约目录下的文件路径
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// 删除整个请求目录，返回删除的文件数
    pub async fn release(mut self) -> Result<u64, ScratchError> {
        self.released = true;

        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(0);
        }

        let mut removed = 0u64;
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ScratchError::Io(e.to_string()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ScratchError::Io(e.to_string()))?
        {
            if entry.path().is_file() {
                removed += 1;
            }
        }

        tokio::fs::remove_dir_all(&self.dir)
            .await
            .map_err(|e| ScratchError::Io(e.to_string()))?;

        tracing::debug!(
            request_id = %self.request_id,
            files = removed,
            "Scratch workspace released"
        );

        Ok(removed)
    }
}

impl Drop for ScratchLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => tracing::debug!(
                request_id = %self.request_id,
                "Scratch workspace removed on drop"
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                request_id = %self.request_id,
                dir = %self.dir.display(),
                error = %e,
                "Failed to remove scratch workspace on drop"
            ),
        }
    }
}

/// Scratch Storage Port
#[async_trait]
pub trait ScratchStoragePort: Send + Sync {
    /// 请求目录路径（不创建）
    fn workspace_dir(&self, request_id: Uuid) -> PathBuf;

    /// 创建请求目录并返回租约
    async fn lease(&self, request_id: Uuid) -> Result<ScratchLease, ScratchError>;

    /// 清理残留的请求目录（进程崩溃后遗留），返回删除的目录数
    async fn purge_stale(&self) -> Result<u64, ScratchError>;

    /// 统计当前占用
    async fn get_stats(&self) -> Result<ScratchStats, ScratchError>;
}
