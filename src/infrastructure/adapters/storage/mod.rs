//! Storage Adapters

mod file_scratch;
mod voice_clips;

pub use file_scratch::FileScratchStorage;
pub use voice_clips::FileVoiceClipStore;
