//! Chat Host Port - 宿主消息接口抽象

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::{MessagePart, ReplyTarget};

/// 宿主发送错误
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Host rejected message: retcode={retcode} {message}")]
    Rejected { retcode: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Chat Host Port
#[async_trait]
pub trait ChatHostPort: Send + Sync {
    /// 向私聊或群聊发送一条由若干片段组成的消息
    async fn send_message(
        &self,
        target: &ReplyTarget,
        parts: Vec<MessagePart>,
    ) -> Result<(), HostError>;
}
