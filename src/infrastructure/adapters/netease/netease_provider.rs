//! NetEase Provider - 网易云音乐搜索与直链
//!
//! 实现 MusicProviderPort trait
//!
//! 外部 API:
//! GET https://music.163.com/api/search/get?s=<title>&type=1&offset=0&limit=15
//! Response: {"code": 200, "result": {"songs": [{"id": 1, "name": "...", "fee": 0}]}}
//!
//! GET https://music.163.com/song/media/outer/url?id=<id>.mp3
//! Response: 302, Location 为 CDN 直链

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{LocateError, MusicProviderPort, ResolveError};
use crate::domain::song::{ResolvedTrack, SearchQuery, TrackCandidate, TrackId, TrackLocation};

/// 搜索类型：单曲
const SEARCH_TYPE_SONG: &str = "1";

/// 网易云客户端配置
#[derive(Debug, Clone)]
pub struct NeteaseConfig {
    /// 搜索接口
    pub search_url: String,
    /// 外链接口，`?id=<id>.mp3` 追加在后面
    pub media_url: String,
    /// 每次搜索返回的候选数量
    pub search_limit: u32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NeteaseConfig {
    fn default() -> Self {
        Self {
            search_url: "https://music.163.com/api/search/get".to_string(),
            media_url: "https://music.163.com/song/media/outer/url".to_string(),
            search_limit: 15,
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    code: i64,
    #[serde(default)]
    result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    /// 逐首解析，单首字段异常不影响其余候选
    #[serde(default)]
    songs: Option<Vec<Value>>,
}

/// 把一首歌解析为候选；没有可用 ID 的条目返回 None
///
/// `fee` 缺省视为免费，null 或非整数视为付费
fn parse_song(item: &Value) -> Option<TrackCandidate> {
    let id = match item.get("id")? {
        Value::Number(n) => n.as_i64()?.to_string(),
        Value::String(s) if !s.is_empty() => s.clone(),
        _ => return None,
    };
    let fee = match item.get("fee") {
        None => Some(0),
        Some(v) => v.as_i64(),
    };

    Some(TrackCandidate {
        id: TrackId::new(id),
        name: item.get("name").and_then(Value::as_str).map(str::to_string),
        fee,
    })
}

/// 网易云音乐源
pub struct NeteaseProvider {
    client: Client,
    /// 不跟随跳转，用来读取 302 的 Location
    no_redirect: Client,
    config: NeteaseConfig,
}

impl NeteaseProvider {
    pub const NAME: &'static str = "netease";

    pub fn new(config: NeteaseConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        let no_redirect = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            no_redirect,
            config,
        })
    }

    /// 外链地址
    fn media_url(&self, id: &TrackId) -> String {
        format!("{}?id={}.mp3", self.config.media_url, id)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<TrackCandidate>, ResolveError> {
        let limit = self.config.search_limit.to_string();

        let response = self
            .client
            .get(&self.config.search_url)
            .query(&[
                ("s", query.as_str()),
                ("type", SEARCH_TYPE_SONG),
                ("offset", "0"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Network(format!("HTTP {}", status)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::InvalidResponse(e.to_string()))?;

        if body.code != 200 {
            return Err(ResolveError::Api { code: body.code });
        }

        let songs = body.result.and_then(|r| r.songs).unwrap_or_default();
        let candidates: Vec<TrackCandidate> = songs.iter().filter_map(parse_song).collect();
        if candidates.len() < songs.len() {
            tracing::debug!(
                query = %query,
                skipped = songs.len() - candidates.len(),
                "Skipped search results without a usable id"
            );
        }

        Ok(candidates)
    }
}

#[async_trait]
impl MusicProviderPort for NeteaseProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn search_free_track(&self, query: &SearchQuery) -> Result<ResolvedTrack, ResolveError> {
        let candidates = self.search(query).await?;
        if candidates.is_empty() {
            return Err(ResolveError::NoResults);
        }

        let chosen = TrackCandidate::first_free(&candidates).ok_or(ResolveError::PaidOnly {
            candidates: candidates.len(),
        })?;

        tracing::debug!(
            query = %query,
            candidates = candidates.len(),
            track_id = %chosen.id,
            "NetEase search finished"
        );

        Ok(ResolvedTrack {
            provider: Self::NAME.to_string(),
            id: chosen.id.clone(),
            name: chosen.name.clone(),
        })
    }

    async fn locate_stream(&self, track: &ResolvedTrack) -> Result<TrackLocation, LocateError> {
        let response = self
            .no_redirect
            .get(self.media_url(&track.id))
            .send()
            .await
            .map_err(|e| LocateError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::FOUND {
            return Err(LocateError::NotRedirected {
                status: status.as_u16(),
            });
        }

        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(TrackLocation::new)
            .ok_or(LocateError::MissingLocation)
    }
}
