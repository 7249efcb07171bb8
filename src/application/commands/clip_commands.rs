//! Voice Clip Commands - 内置语音命令

use crate::domain::chat::ReplyTarget;

/// 发送内置语音命令
#[derive(Debug, Clone)]
pub struct PlayVoiceClip {
    /// 语音目录下的文件名
    pub file: String,
    pub reply_to: ReplyTarget,
}
