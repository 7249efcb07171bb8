//! Chat Context - 聊天限界上下文
//!
//! 职责:
//! - 会话类型（私聊 / 群聊）与回复目标
//! - 出站消息片段
//! - 触发词匹配

mod trigger;
mod value_objects;

pub use trigger::{ClipTrigger, Trigger, TriggerSet};
pub use value_objects::{IncomingMessage, MessagePart, ReplyTarget, Surface};
