//! Voice Clip Store Port - 内置语音

use async_trait::async_trait;
use thiserror::Error;

/// 内置语音读取错误
#[derive(Debug, Error)]
pub enum ClipStoreError {
    #[error("Voice clip not found: {0}")]
    NotFound(String),

    #[error("Invalid clip name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Voice Clip Store Port
#[async_trait]
pub trait VoiceClipStorePort: Send + Sync {
    /// 读取已编码好的 silk 语音
    async fn load(&self, file: &str) -> Result<Vec<u8>, ClipStoreError>;

    /// 语音是否存在
    async fn exists(&self, file: &str) -> bool;
}
