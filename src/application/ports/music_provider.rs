//! Music Provider Port - 音乐源抽象
//!
//! 一个音乐源负责两件事：按歌名找出第一首免费曲目、把曲目 ID 换成直链。
//! 应用层按配置顺序依次尝试多个音乐源。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::song::{ResolvedTrack, SearchQuery, TrackLocation};

/// 曲目搜索错误
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Empty song title")]
    EmptyQuery,

    #[error("No search results")]
    NoResults,

    #[error("All {candidates} candidates are paid")]
    PaidOnly { candidates: usize },

    #[error("Search API returned code {code}")]
    Api { code: i64 },

    #[error("No music provider configured")]
    NoProvider,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ResolveError {
    /// 是否为“确实没有可用曲目”，而非接口/网络故障
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::EmptyQuery
                | ResolveError::NoResults
                | ResolveError::PaidOnly { .. }
                | ResolveError::Api { .. }
        )
    }
}

/// 直链获取错误
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("Expected redirect, got HTTP {status}")]
    NotRedirected { status: u16 },

    #[error("Redirect without Location header")]
    MissingLocation,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Music Provider Port
#[async_trait]
pub trait MusicProviderPort: Send + Sync {
    /// 音乐源名称，用于日志以及把直链请求路由回同一音乐源
    fn name(&self) -> &str;

    /// 搜索歌名，按返回顺序取第一首免费曲目
    async fn search_free_track(&self, query: &SearchQuery) -> Result<ResolvedTrack, ResolveError>;

    /// 通过 302 跳转获取直链（不跟随跳转）
    async fn locate_stream(&self, track: &ResolvedTrack) -> Result<TrackLocation, LocateError>;
}
