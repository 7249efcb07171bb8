//! Message Responder - 消息触发与分发
//!
//! 私聊与群聊共用同一套逻辑，区别只在回复目标。
//! 命中触发词的消息会被消费（阻止宿主继续分发），其余消息原样放行。

use std::sync::Arc;

use crate::application::commands::handlers::{
    ClipError, PlayVoiceClipHandler, RequestSongHandler, SongRequestError,
};
use crate::application::commands::{DeliveredSong, PlayVoiceClip, RequestSong};
use crate::domain::chat::{IncomingMessage, ReplyTarget, Trigger, TriggerSet};

/// 消息处理后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 已处理，宿主不应再交给其他插件
    Consumed,
    /// 未命中，交给宿主默认处理
    PassThrough,
}

/// 一次触发的执行结果
#[derive(Debug)]
pub enum ResponseOutcome {
    Song(Result<DeliveredSong, SongRequestError>),
    Clip(Result<(), ClipError>),
}

pub struct MessageResponder {
    triggers: TriggerSet,
    song_handler: RequestSongHandler,
    clip_handler: PlayVoiceClipHandler,
}

impl MessageResponder {
    pub fn new(
        triggers: TriggerSet,
        song_handler: RequestSongHandler,
        clip_handler: PlayVoiceClipHandler,
    ) -> Self {
        Self {
            triggers,
            song_handler,
            clip_handler,
        }
    }

    /// 只做匹配，不执行；用于在后台执行前先答复宿主
    pub fn classify(&self, text: &str) -> Option<Trigger> {
        self.triggers.matches(text)
    }

    /// 完整处理一条消息
    pub async fn respond(&self, message: &IncomingMessage) -> Disposition {
        match self.classify(&message.text) {
            Some(trigger) => {
                self.dispatch(trigger, message.reply_to.clone()).await;
                Disposition::Consumed
            }
            None => Disposition::PassThrough,
        }
    }

    /// 执行一个已匹配的触发，错误已在各 handler 内记录并回复
    pub async fn dispatch(&self, trigger: Trigger, reply_to: ReplyTarget) -> ResponseOutcome {
        match trigger {
            Trigger::Clip(clip) => {
                let result = self
                    .clip_handler
                    .handle(PlayVoiceClip {
                        file: clip.file.clone(),
                        reply_to,
                    })
                    .await;
                if let Err(e) = &result {
                    tracing::error!(clip = %clip.file, error = %e, "Voice clip failed");
                }
                ResponseOutcome::Clip(result)
            }
            Trigger::Song { title } => {
                let result = self
                    .song_handler
                    .handle(RequestSong { title, reply_to })
                    .await;
                ResponseOutcome::Song(result)
            }
        }
    }
}

/// 便于在 `tokio::spawn` 中共享
pub type SharedResponder = Arc<MessageResponder>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::ReplyTexts;
    use crate::application::ports::{MusicProviderPort, TranscodeConfig};
    use crate::application::services::TrackResolver;
    use crate::application::testing::{
        FakeClipStore, FakeFetcher, FakeProvider, FakeTranscoder, RecordingHost,
    };
    use crate::domain::chat::{ClipTrigger, MessagePart};
    use crate::domain::song::VoicePayload;
    use crate::infrastructure::adapters::FileScratchStorage;
    use tempfile::tempdir;

    struct Fixture {
        responder: MessageResponder,
        provider: Arc<FakeProvider>,
        host: Arc<RecordingHost>,
        _scratch_dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let scratch_dir = tempdir().unwrap();
        let provider = Arc::new(FakeProvider::new(
            "netease",
            vec![("100", 0)],
            Some("https://host/a.mp3"),
        ));
        let host = Arc::new(RecordingHost::default());
        let providers: Vec<Arc<dyn MusicProviderPort>> = vec![provider.clone()];

        let song_handler = RequestSongHandler::new(
            Arc::new(TrackResolver::new(providers)),
            Arc::new(FakeFetcher::new(b"mp3")),
            Arc::new(FakeTranscoder::new()),
            Arc::new(FileScratchStorage::new(scratch_dir.path()).await.unwrap()),
            host.clone(),
            Arc::new(TranscodeConfig::default()),
            ReplyTexts::default(),
        );
        let clip_handler = PlayVoiceClipHandler::new(
            Arc::new(FakeClipStore::new(&[
                ("200.silk", &b"clip-200"[..]),
                ("sing.silk", &b"clip-sing"[..]),
                ("song.silk", &b"clip-song"[..]),
            ])),
            host.clone(),
        );
        let triggers = TriggerSet::new(
            "点歌",
            vec![
                ClipTrigger {
                    phrase: "乓啪咔乓乓乓".to_string(),
                    file: "200.silk".to_string(),
                },
                ClipTrigger {
                    phrase: "唱歌".to_string(),
                    file: "sing.silk".to_string(),
                },
                ClipTrigger {
                    phrase: "点歌".to_string(),
                    file: "song.silk".to_string(),
                },
            ],
        )
        .unwrap();

        Fixture {
            responder: MessageResponder::new(triggers, song_handler, clip_handler),
            provider,
            host,
            _scratch_dir: scratch_dir,
        }
    }

    #[tokio::test]
    async fn test_song_request_in_person_chat() {
        let f = fixture().await;
        let disposition = f
            .responder
            .respond(&IncomingMessage::person("10001", "点歌 晴天"))
            .await;

        assert_eq!(disposition, Disposition::Consumed);
        let sent = f.host.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, ReplyTarget::person("10001"));
        assert_eq!(f.host.voice_count(), 1);
    }

    #[tokio::test]
    async fn test_song_request_in_group_replies_to_group() {
        let f = fixture().await;
        f.responder
            .respond(&IncomingMessage::group("20002", "10001", "点歌 晴天"))
            .await;

        assert_eq!(f.host.sent()[0].0, ReplyTarget::group("20002"));
    }

    #[tokio::test]
    async fn test_clip_phrase_bypasses_song_pipeline() {
        let f = fixture().await;
        let disposition = f
            .responder
            .respond(&IncomingMessage::group("20002", "10001", "点歌"))
            .await;

        assert_eq!(disposition, Disposition::Consumed);
        assert_eq!(f.provider.searches(), 0);
        assert_eq!(
            f.host.sent()[0].1,
            vec![MessagePart::Voice(VoicePayload::from_bytes(b"clip-song"))]
        );
    }

    #[tokio::test]
    async fn test_clip_phrases() {
        let f = fixture().await;
        f.responder
            .respond(&IncomingMessage::person("10001", "乓啪咔乓乓乓"))
            .await;
        f.responder
            .respond(&IncomingMessage::person("10001", "唱歌"))
            .await;

        let sent = f.host.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0].1,
            vec![MessagePart::Voice(VoicePayload::from_bytes(b"clip-200"))]
        );
        assert_eq!(
            sent[1].1,
            vec![MessagePart::Voice(VoicePayload::from_bytes(b"clip-sing"))]
        );
    }

    #[tokio::test]
    async fn test_unmatched_message_passes_through() {
        let f = fixture().await;
        let disposition = f
            .responder
            .respond(&IncomingMessage::person("10001", "你好"))
            .await;

        assert_eq!(disposition, Disposition::PassThrough);
        assert!(f.host.sent().is_empty());
        assert_eq!(f.provider.searches(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_reports_outcome() {
        let f = fixture().await;
        let trigger = f.responder.classify("点歌 ").unwrap();
        match f.responder.dispatch(trigger, ReplyTarget::person("1")).await {
            ResponseOutcome::Song(Err(SongRequestError::NotFound(_))) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(f.host.texts(), vec!["未找到该歌曲".to_string()]);
    }
}
