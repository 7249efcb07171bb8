//! Song Context - Value Objects

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// 搜索词（歌名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Err("歌名不能为空");
        }
        Ok(Self(title.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 曲目在音乐平台上的标识（不透明）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 搜索结果中的候选曲目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCandidate {
    pub id: TrackId,
    pub name: Option<String>,
    /// 付费标识，`Some(0)` 表示免费；接口给出 null 等无法识别的值时为 None，按付费处理
    pub fee: Option<i64>,
}

impl TrackCandidate {
    pub fn is_free(&self) -> bool {
        self.fee == Some(0)
    }

    /// 按 API 返回顺序挑出第一首免费曲目
    pub fn first_free(candidates: &[TrackCandidate]) -> Option<&TrackCandidate> {
        candidates.iter().find(|c| c.is_free())
    }
}

/// 已选定的免费曲目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    /// 产出该曲目的音乐源名称
    pub provider: String,
    pub id: TrackId,
    pub name: Option<String>,
}

/// 曲目直链，仅在本次请求内有效
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLocation(String);

impl TrackLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// base64 编码后的 silk 语音
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePayload(String);

impl VoicePayload {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(STANDARD.encode(data))
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// OneBot `record` 段使用的 file 字段
    pub fn to_file_uri(&self) -> String {
        format!("base64://{}", self.0)
    }
}
