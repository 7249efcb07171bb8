//! HTTP Audio Fetcher - 直链下载
//!
//! 实现 AudioFetcherPort trait，按块写入目标文件并限制最大体积

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{AudioFetcherPort, FetchError};
use crate::domain::song::TrackLocation;

/// 下载配置
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 单次下载的最大字节数
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            max_bytes: 50 * 1024 * 1024,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        }
    }
}

/// HTTP 下载器
pub struct HttpAudioFetcher {
    client: Client,
    config: HttpFetcherConfig,
}

impl HttpAudioFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn stream_to_file(
        &self,
        mut response: reqwest::Response,
        path: &Path,
    ) -> Result<u64, FetchError> {
        let limit = self.config.max_bytes;
        let mut file = fs::File::create(path)
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
        {
            written += chunk.len() as u64;
            if written > limit {
                return Err(FetchError::TooLarge { limit });
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::Io(e.to_string()))?;
        }

        file.flush()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        Ok(written)
    }
}

#[async_trait]
impl AudioFetcherPort for HttpAudioFetcher {
    async fn download(
        &self,
        location: &TrackLocation,
        dest_dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, FetchError> {
        let response = self
            .client
            .get(location.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let limit = self.config.max_bytes;
        if response.content_length().map_or(false, |len| len > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;
        let path = dest_dir.join(filename);

        match self.stream_to_file(response, &path).await {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), bytes, "Audio downloaded");
                Ok(path)
            }
            Err(e) => {
                // 不留半截文件
                let _ = fs::remove_file(&path).await;
                Err(e)
            }
        }
    }
}
