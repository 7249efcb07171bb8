//! 应用层 - 命令
//!
//! 每条触发消息对应一个命令，由对应 handler 执行并回复

mod clip_commands;
mod song_commands;

pub mod handlers;

pub use clip_commands::*;
pub use song_commands::*;
