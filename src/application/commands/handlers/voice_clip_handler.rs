//! Voice Clip Handler - 发送内置语音

use std::sync::Arc;
use thiserror::Error;

use crate::application::commands::PlayVoiceClip;
use crate::application::ports::{ChatHostPort, ClipStoreError, HostError, VoiceClipStorePort};
use crate::domain::chat::MessagePart;
use crate::domain::song::VoicePayload;

/// 内置语音发送失败
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("Failed to load clip: {0}")]
    Store(#[from] ClipStoreError),

    #[error("Failed to deliver clip: {0}")]
    Delivery(#[from] HostError),
}

/// PlayVoiceClip Handler
pub struct PlayVoiceClipHandler {
    clips: Arc<dyn VoiceClipStorePort>,
    host: Arc<dyn ChatHostPort>,
}

impl PlayVoiceClipHandler {
    pub fn new(clips: Arc<dyn VoiceClipStorePort>, host: Arc<dyn ChatHostPort>) -> Self {
        Self { clips, host }
    }

    pub async fn handle(&self, command: PlayVoiceClip) -> Result<(), ClipError> {
        let data = self.clips.load(&command.file).await?;
        let payload = VoicePayload::from_bytes(&data);

        self.host
            .send_message(&command.reply_to, vec![MessagePart::Voice(payload)])
            .await?;

        tracing::info!(
            reply_to = %command.reply_to,
            clip = %command.file,
            bytes = data.len(),
            "Voice clip sent"
        );

        Ok(())
    }
}
