//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_fetcher;
mod chat_host;
mod music_provider;
mod scratch_storage;
mod voice_clips;
mod voice_transcoder;

pub use audio_fetcher::{AudioFetcherPort, FetchError};
pub use chat_host::{ChatHostPort, HostError};
pub use music_provider::{LocateError, MusicProviderPort, ResolveError};
pub use scratch_storage::{ScratchError, ScratchLease, ScratchStats, ScratchStoragePort};
pub use voice_clips::{ClipStoreError, VoiceClipStorePort};
pub use voice_transcoder::{TranscodeConfig, TranscodeError, VoiceTranscoderPort};
