//! Silk Transcoder - 调用外部工具把音频编码为 silk
//!
//! 两步：ffmpeg 解码为 s16le 单声道 PCM，再由 silk 编码器编码。
//! 中间 PCM 与源文件同目录同名，无论成败都会删除。

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::application::ports::{TranscodeConfig, TranscodeError, VoiceTranscoderPort};

/// stderr 保留的最大字符数
const STDERR_TAIL_CHARS: usize = 512;

/// 外部工具转码器
#[derive(Debug, Default, Clone)]
pub struct SilkTranscoder;

impl SilkTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// 源文件对应的中间 PCM 路径
    pub fn pcm_path(source: &Path) -> PathBuf {
        source.with_extension("pcm")
    }

    async fn encode(
        &self,
        source: &Path,
        pcm: &Path,
        dest: &Path,
        config: &TranscodeConfig,
    ) -> Result<(), TranscodeError> {
        let rate = config.sample_rate.to_string();
        let timeout = Duration::from_secs(config.timeout_secs);

        let mut ffmpeg = Command::new(&config.ffmpeg_path);
        ffmpeg
            .arg("-y")
            .arg("-i")
            .arg(source)
            .args(["-f", "s16le", "-ar", rate.as_str(), "-ac", "1"])
            .arg(pcm);
        run_tool(&config.ffmpeg_path, ffmpeg, timeout).await?;

        let mut encoder = Command::new(&config.encoder_path);
        encoder.arg(pcm).arg(dest).args(["-rate", rate.as_str()]);
        if !config.encoder_flag.is_empty() {
            encoder.arg(&config.encoder_flag);
        }
        run_tool(&config.encoder_path, encoder, timeout).await?;

        if !tokio::fs::try_exists(dest).await.unwrap_or(false) {
            return Err(TranscodeError::MissingOutput(dest.display().to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl VoiceTranscoderPort for SilkTranscoder {
    async fn transcode(
        &self,
        source: &Path,
        dest: &Path,
        config: &TranscodeConfig,
    ) -> Result<PathBuf, TranscodeError> {
        let pcm = Self::pcm_path(source);

        let result = self.encode(source, &pcm, dest, config).await;

        if let Err(e) = tokio::fs::remove_file(&pcm).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    pcm = %pcm.display(),
                    error = %e,
                    "Failed to remove intermediate PCM"
                );
            }
        }

        match &result {
            Ok(()) => tracing::debug!(
                source = %source.display(),
                dest = %dest.display(),
                sample_rate = config.sample_rate,
                "Transcoded to silk"
            ),
            Err(e) => tracing::warn!(source = %source.display(), error = %e, "Transcode failed"),
        }

        result.map(|_| dest.to_path_buf())
    }
}

/// 运行一个外部工具直到退出；超时后子进程随 future 一起被杀掉
async fn run_tool(path: &Path, mut cmd: Command, timeout: Duration) -> Result<(), TranscodeError> {
    let tool = tool_name(path);

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| TranscodeError::Spawn {
        tool: tool.clone(),
        reason: e.to_string(),
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output.map_err(|e| TranscodeError::Io(e.to_string()))?,
        Err(_) => {
            return Err(TranscodeError::Timeout {
                tool,
                secs: timeout.as_secs(),
            })
        }
    };

    if !output.status.success() {
        return Err(TranscodeError::ProcessFailed {
            tool,
            status: output.status.to_string(),
            stderr: stderr_tail(&output.stderr),
        });
    }

    Ok(())
}

fn tool_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_else(|| OsStr::new(""))
        .to_string_lossy()
        .to_string()
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let skip = text.chars().count().saturating_sub(STDERR_TAIL_CHARS);
    text.chars().skip(skip).collect()
}

/// 返回配置中不存在的外部工具路径
pub fn check_tools(config: &TranscodeConfig) -> Vec<PathBuf> {
    [&config.ffmpeg_path, &config.encoder_path]
        .into_iter()
        .filter(|path| !path.is_file())
        .cloned()
        .collect()
}
