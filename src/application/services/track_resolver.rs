//! Track Resolver - 按顺序尝试多个音乐源
//!
//! 第一个返回免费曲目的音乐源胜出；全部失败时返回最后一个音乐源的错误。
//! 直链请求路由回找到曲目的那个音乐源。

use std::sync::Arc;

use crate::application::ports::{LocateError, MusicProviderPort, ResolveError};
use crate::domain::song::{ResolvedTrack, SearchQuery, TrackLocation};

pub struct TrackResolver {
    providers: Vec<Arc<dyn MusicProviderPort>>,
}

impl TrackResolver {
    pub fn new(providers: Vec<Arc<dyn MusicProviderPort>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn resolve(&self, title: &str) -> Result<ResolvedTrack, ResolveError> {
        let query = SearchQuery::new(title).map_err(|_| ResolveError::EmptyQuery)?;

        let mut last_error = ResolveError::NoProvider;
        for provider in &self.providers {
            match provider.search_free_track(&query).await {
                Ok(track) => {
                    tracing::info!(
                        provider = %provider.name(),
                        query = %query,
                        track_id = %track.id,
                        track_name = ?track.name,
                        "Free track resolved"
                    );
                    return Ok(track);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = %provider.name(),
                        query = %query,
                        error = %e,
                        "Provider yielded no free track"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    pub async fn locate_stream(&self, track: &ResolvedTrack) -> Result<TrackLocation, LocateError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.name() == track.provider)
            .ok_or_else(|| LocateError::UnknownProvider(track.provider.clone()))?;

        let location = provider.locate_stream(track).await.map_err(|e| {
            tracing::warn!(
                provider = %track.provider,
                track_id = %track.id,
                error = %e,
                "Failed to locate stream"
            );
            e
        })?;

        tracing::debug!(track_id = %track.id, url = %location, "Stream located");
        Ok(location)
    }
}
