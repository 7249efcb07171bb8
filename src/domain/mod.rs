//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Song Context: 点歌请求涉及的曲目、直链与语音载荷
//! - Chat Context: 聊天消息、回复目标与触发词

pub mod chat;
pub mod song;
