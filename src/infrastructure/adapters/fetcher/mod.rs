//! Fetcher Adapters

mod http_fetcher;

pub use http_fetcher::{HttpAudioFetcher, HttpFetcherConfig};
