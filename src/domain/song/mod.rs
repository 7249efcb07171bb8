//! Song Context - 曲目限界上下文
//!
//! 职责:
//! - 搜索词校验
//! - 候选曲目与免费判定
//! - 直链与语音载荷

mod value_objects;

pub use value_objects::{
    ResolvedTrack, SearchQuery, TrackCandidate, TrackId, TrackLocation, VoicePayload,
};
