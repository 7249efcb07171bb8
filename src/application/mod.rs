//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（MusicProvider、AudioFetcher、VoiceTranscoder、ChatHost 等）
//! - commands: 点歌与内置语音命令及处理器
//! - services: 多音乐源解析、消息分发
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use commands::{
    handlers::{ClipError, PlayVoiceClipHandler, RequestSongHandler, SongRequestError},
    DeliveredSong, PlayVoiceClip, ReplyKind, ReplyTexts, RequestSong,
};

pub use error::ApplicationError;

pub use ports::{
    // Music provider
    LocateError,
    MusicProviderPort,
    ResolveError,
    // Fetcher
    AudioFetcherPort,
    FetchError,
    // Transcoder
    TranscodeConfig,
    TranscodeError,
    VoiceTranscoderPort,
    // Storage
    ClipStoreError,
    ScratchError,
    ScratchLease,
    ScratchStats,
    ScratchStoragePort,
    VoiceClipStorePort,
    // Host
    ChatHostPort,
    HostError,
};

pub use services::{Disposition, MessageResponder, ResponseOutcome, SharedResponder, TrackResolver};
