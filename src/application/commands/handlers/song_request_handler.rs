//! Song Request Handler - 点歌流水线
//!
//! 搜索 → 直链 → 下载 → 转码 → 发送语音。
//! 任一阶段失败都以结构化错误返回，面向用户的回复文案只在这里决定一次。

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::commands::{DeliveredSong, ReplyKind, ReplyTexts, RequestSong};
use crate::application::ports::{
    AudioFetcherPort, ChatHostPort, FetchError, HostError, LocateError, ResolveError,
    ScratchError, ScratchLease, ScratchStoragePort, TranscodeConfig, TranscodeError,
    VoiceTranscoderPort,
};
use crate::application::services::TrackResolver;
use crate::domain::chat::{MessagePart, ReplyTarget};
use crate::domain::song::{TrackLocation, VoicePayload};

/// 请求目录内的固定文件名
const SOURCE_FILE: &str = "source.mp3";
const VOICE_FILE: &str = "voice.silk";

/// 点歌失败原因
#[derive(Debug, Error)]
pub enum SongRequestError {
    #[error("Song not found: {0}")]
    NotFound(#[source] ResolveError),

    #[error("Stream link unavailable: {0}")]
    LinkUnavailable(#[source] LocateError),

    #[error("Download failed: {0}")]
    Download(#[source] FetchError),

    #[error("Transcode failed: {0}")]
    Transcode(#[source] TranscodeError),

    #[error("Scratch storage failed: {0}")]
    Scratch(#[source] ScratchError),

    #[error("Failed to read encoded voice: {0}")]
    ReadVoice(String),

    #[error("Failed to deliver reply: {0}")]
    Delivery(#[source] HostError),
}

impl SongRequestError {
    /// 对应的用户回复；`Delivery` 表示回复本身发不出去，不再回复
    pub fn reply_kind(&self) -> Option<ReplyKind> {
        match self {
            SongRequestError::LinkUnavailable(_) => Some(ReplyKind::LinkUnavailable),
            SongRequestError::Delivery(_) => None,
            _ => Some(ReplyKind::SongNotFound),
        }
    }
}

/// RequestSong Handler
pub struct RequestSongHandler {
    resolver: Arc<TrackResolver>,
    fetcher: Arc<dyn AudioFetcherPort>,
    transcoder: Arc<dyn VoiceTranscoderPort>,
    scratch: Arc<dyn ScratchStoragePort>,
    host: Arc<dyn ChatHostPort>,
    transcode_config: Arc<TranscodeConfig>,
    replies: ReplyTexts,
}

impl RequestSongHandler {
    pub fn new(
        resolver: Arc<TrackResolver>,
        fetcher: Arc<dyn AudioFetcherPort>,
        transcoder: Arc<dyn VoiceTranscoderPort>,
        scratch: Arc<dyn ScratchStoragePort>,
        host: Arc<dyn ChatHostPort>,
        transcode_config: Arc<TranscodeConfig>,
        replies: ReplyTexts,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            transcoder,
            scratch,
            host,
            transcode_config,
            replies,
        }
    }

    pub async fn handle(&self, command: RequestSong) -> Result<DeliveredSong, SongRequestError> {
        let request_id = Uuid::new_v4();
        let target = &command.reply_to;

        tracing::info!(
            request_id = %request_id,
            reply_to = %target,
            title = %command.title.trim(),
            "Song requested"
        );

        let track = match self.resolver.resolve(&command.title).await {
            Ok(track) => track,
            Err(e) => return Err(self.reply_failure(target, SongRequestError::NotFound(e)).await),
        };

        let location = match self.resolver.locate_stream(&track).await {
            Ok(location) => location,
            Err(e) => {
                return Err(self
                    .reply_failure(target, SongRequestError::LinkUnavailable(e))
                    .await)
            }
        };

        let lease = match self.scratch.lease(request_id).await {
            Ok(lease) => lease,
            Err(e) => return Err(self.reply_failure(target, SongRequestError::Scratch(e)).await),
        };

        let outcome = match self.produce_voice(&location, &lease).await {
            Ok((payload, voice_bytes)) => self
                .host
                .send_message(target, vec![MessagePart::Voice(payload)])
                .await
                .map(|_| DeliveredSong {
                    request_id,
                    track,
                    voice_bytes,
                })
                .map_err(SongRequestError::Delivery),
            Err(e) => Err(self.reply_failure(target, e).await),
        };

        Self::release_workspace(lease).await;

        match &outcome {
            Ok(delivered) => tracing::info!(
                request_id = %request_id,
                reply_to = %target,
                track_id = %delivered.track.id,
                voice_bytes = delivered.voice_bytes,
                "Song delivered"
            ),
            Err(e) => tracing::warn!(
                request_id = %request_id,
                reply_to = %target,
                error = %e,
                "Song request failed"
            ),
        }

        outcome
    }

    /// 下载、转码并读取 silk，全部落在请求目录内
    async fn produce_voice(
        &self,
        location: &TrackLocation,
        lease: &ScratchLease,
    ) -> Result<(VoicePayload, usize), SongRequestError> {
        let source = self
            .fetcher
            .download(location, lease.dir(), SOURCE_FILE)
            .await
            .map_err(SongRequestError::Download)?;

        let voice = self
            .transcoder
            .transcode(&source, &lease.file(VOICE_FILE), &self.transcode_config)
            .await
            .map_err(SongRequestError::Transcode)?;

        let data = tokio::fs::read(&voice)
            .await
            .map_err(|e| SongRequestError::ReadVoice(e.to_string()))?;

        tracing::debug!(
            request_id = %lease.request_id(),
            voice_bytes = data.len(),
            "Voice encoded"
        );

        Ok((VoicePayload::from_bytes(&data), data.len()))
    }

    /// 发送失败文案，返回原始错误；文案发不出去只记录日志
    async fn reply_failure(
        &self,
        target: &ReplyTarget,
        error: SongRequestError,
    ) -> SongRequestError {
        if let Some(kind) = error.reply_kind() {
            let text = self.replies.text_for(kind).to_string();
            if let Err(e) = self
                .host
                .send_message(target, vec![MessagePart::Plain(text)])
                .await
            {
                tracing::error!(reply_to = %target, error = %e, "Failed to send fallback reply");
            }
        }
        error
    }

    async fn release_workspace(lease: ScratchLease) {
        let request_id = lease.request_id();
        if let Err(e) = lease.release().await {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Failed to release scratch workspace"
            );
        }
    }
}
