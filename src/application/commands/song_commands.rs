//! Song Commands - 点歌相关命令

use uuid::Uuid;

use crate::domain::chat::ReplyTarget;
use crate::domain::song::ResolvedTrack;

/// 点歌命令
#[derive(Debug, Clone)]
pub struct RequestSong {
    /// 触发词之后的原始歌名
    pub title: String,
    pub reply_to: ReplyTarget,
}

/// 点歌成功的结果
#[derive(Debug, Clone)]
pub struct DeliveredSong {
    pub request_id: Uuid,
    pub track: ResolvedTrack,
    /// 发送的 silk 字节数
    pub voice_bytes: usize,
}

/// 面向用户的失败回复类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// 没找到歌（含下载、转码失败）
    SongNotFound,
    /// 找到了歌但拿不到直链
    LinkUnavailable,
}

/// 失败回复文案
#[derive(Debug, Clone)]
pub struct ReplyTexts {
    pub song_not_found: String,
    pub link_unavailable: String,
}

impl Default for ReplyTexts {
    fn default() -> Self {
        Self {
            song_not_found: "未找到该歌曲".to_string(),
            link_unavailable: "获取歌曲链接失败".to_string(),
        }
    }
}

impl ReplyTexts {
    pub fn text_for(&self, kind: ReplyKind) -> &str {
        match kind {
            ReplyKind::SongNotFound => &self.song_not_found,
            ReplyKind::LinkUnavailable => &self.link_unavailable,
        }
    }
}
