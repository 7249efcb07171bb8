//! File Scratch Storage - 文件系统请求级临时目录
//!
//! 实现 ScratchStoragePort trait，目录布局：`<base_dir>/<request_id>/`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ScratchError, ScratchLease, ScratchStats, ScratchStoragePort};

/// 文件系统临时存储
pub struct FileScratchStorage {
    /// 临时目录根
    base_dir: PathBuf,
}

impl FileScratchStorage {
    /// 创建新的临时存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ScratchError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ScratchError::Io(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取临时目录根
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 根目录下以请求 ID 命名的子目录
    async fn workspace_dirs(&self) -> Result<Vec<PathBuf>, ScratchError> {
        let mut dirs = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| ScratchError::Io(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ScratchError::Io(e.to_string()))?
        {
            let path = entry.path();
            let is_workspace = entry
                .file_name()
                .to_str()
                .map_or(false, |name| Uuid::parse_str(name).is_ok());
            if is_workspace && path.is_dir() {
                dirs.push(path);
            }
        }

        Ok(dirs)
    }
}

#[async_trait]
impl ScratchStoragePort for FileScratchStorage {
    fn workspace_dir(&self, request_id: Uuid) -> PathBuf {
        self.base_dir.join(request_id.to_string())
    }

    async fn lease(&self, request_id: Uuid) -> Result<ScratchLease, ScratchError> {
        let dir = self.workspace_dir(request_id);

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ScratchError::Io(e.to_string()))?;

        tracing::debug!(
            request_id = %request_id,
            dir = %dir.display(),
            "Scratch workspace created"
        );

        Ok(ScratchLease::new(request_id, dir))
    }

    async fn purge_stale(&self) -> Result<u64, ScratchError> {
        let mut purged = 0u64;

        for dir in self.workspace_dirs().await? {
            match fs::remove_dir_all(&dir).await {
                Ok(()) => purged += 1,
                Err(e) => tracing::warn!(
                    dir = %dir.display(),
                    error = %e,
                    "Failed to purge stale scratch workspace"
                ),
            }
        }

        if purged > 0 {
            tracing::info!(
                base_dir = %self.base_dir.display(),
                purged,
                "Purged stale scratch workspaces"
            );
        }

        Ok(purged)
    }

    async fn get_stats(&self) -> Result<ScratchStats, ScratchError> {
        let mut stats = ScratchStats::default();

        for dir in self.workspace_dirs().await? {
            stats.workspace_count += 1;

            // 统计该请求目录下的文件
            if let Ok(mut files) = fs::read_dir(&dir).await {
                while let Ok(Some(file_entry)) = files.next_entry().await {
                    if let Ok(metadata) = file_entry.metadata().await {
                        if metadata.is_file() {
                            stats.file_count += 1;
                            stats.used_bytes += metadata.len();
                        }
                    }
                }
            }
        }

        Ok(stats)
    }
}
