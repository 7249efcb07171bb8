//! Chat Context - Value Objects

use serde::{Deserialize, Serialize};

use crate::domain::song::VoicePayload;

/// 会话类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// 私聊
    Person,
    /// 群聊
    Group,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Person => "person",
            Surface::Group => "group",
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 回复目标：私聊回给发送者，群聊回给群
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyTarget {
    pub surface: Surface,
    pub target_id: String,
}

impl ReplyTarget {
    pub fn person(sender_id: impl Into<String>) -> Self {
        Self {
            surface: Surface::Person,
            target_id: sender_id.into(),
        }
    }

    pub fn group(launcher_id: impl Into<String>) -> Self {
        Self {
            surface: Surface::Group,
            target_id: launcher_id.into(),
        }
    }
}

impl std::fmt::Display for ReplyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.surface, self.target_id)
    }
}

/// 出站消息片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    Plain(String),
    Voice(VoicePayload),
}

impl MessagePart {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }
}

/// 收到的一条文本消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub reply_to: ReplyTarget,
    pub sender_id: String,
    pub text: String,
}

impl IncomingMessage {
    /// 私聊消息：回复目标为发送者
    pub fn person(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        let sender_id = sender_id.into();
        Self {
            reply_to: ReplyTarget::person(sender_id.clone()),
            sender_id,
            text: text.into(),
        }
    }

    /// 群消息：回复目标为群号
    pub fn group(
        group_id: impl Into<String>,
        sender_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            reply_to: ReplyTarget::group(group_id),
            sender_id: sender_id.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_replies_to_sender() {
        let msg = IncomingMessage::person("10001", "点歌 晴天");
        assert_eq!(msg.reply_to.surface, Surface::Person);
        assert_eq!(msg.reply_to.target_id, "10001");
    }

    #[test]
    fn test_group_replies_to_group() {
        let msg = IncomingMessage::group("20002", "10001", "唱歌");
        assert_eq!(msg.reply_to, ReplyTarget::group("20002"));
        assert_eq!(msg.sender_id, "10001");
        assert_eq!(msg.reply_to.to_string(), "group:20002");
    }
}
