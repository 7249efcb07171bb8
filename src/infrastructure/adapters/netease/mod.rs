//! NetEase Cloud Music Adapter

mod netease_provider;

pub use netease_provider::{NeteaseConfig, NeteaseProvider};
