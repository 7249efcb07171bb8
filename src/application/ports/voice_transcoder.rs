//! Voice Transcoder Port - 语音转码抽象
//!
//! 将下载的音频转换为聊天平台要求的 silk 语音：
//! 先解码重采样为 s16le 单声道 PCM，再交给 silk 编码器。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to start {tool}: {reason}")]
    Spawn { tool: String, reason: String },

    #[error("{tool} exited with {status}: {stderr}")]
    ProcessFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("Encoder produced no output at {0}")]
    MissingOutput(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// 转码配置
///
/// 启动时确定，之后只读；每次转码调用显式传入
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// 媒体转换器（ffmpeg）路径
    pub ffmpeg_path: PathBuf,
    /// silk 编码器路径
    pub encoder_path: PathBuf,
    /// PCM 与 silk 采样率（Hz）
    pub sample_rate: u32,
    /// 编码器的平台兼容参数
    pub encoder_flag: String,
    /// 单个外部进程的超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("music/ffmpeg"),
            encoder_path: PathBuf::from("music/silk_v3_encoder"),
            sample_rate: 24000,
            encoder_flag: "-tencent".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Voice Transcoder Port
#[async_trait]
pub trait VoiceTranscoderPort: Send + Sync {
    /// 转码 `source` 为 silk 并写入 `dest`
    ///
    /// 中间 PCM 文件与 `source` 同目录，无论成败都会被删除
    async fn transcode(
        &self,
        source: &Path,
        dest: &Path,
        config: &TranscodeConfig,
    ) -> Result<PathBuf, TranscodeError>;
}
