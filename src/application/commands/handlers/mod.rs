//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod song_request_handler;
mod voice_clip_handler;

pub use song_request_handler::*;
pub use voice_clip_handler::*;
