//! Audio Fetcher Port - 音频下载抽象

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::song::TrackLocation;

/// 下载错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} while downloading")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Download exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("IO error: {0}")]
    Io(String),
}

/// Audio Fetcher Port
#[async_trait]
pub trait AudioFetcherPort: Send + Sync {
    /// 下载直链内容到 `dest_dir/filename`（覆盖同名文件），返回写入路径
    ///
    /// `dest_dir` 不存在时自动创建
    async fn download(
        &self,
        location: &TrackLocation,
        dest_dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, FetchError>;
}
