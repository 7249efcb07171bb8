//! Diange - 点歌语音插件
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Song Context: 搜索词、候选曲目、直链、语音载荷
//! - Chat Context: 回复目标、消息片段、触发词
//!
//! 应用层 (application/):
//! - Ports: 端口定义（MusicProvider, AudioFetcher, VoiceTranscoder, ScratchStorage, VoiceClipStore, ChatHost）
//! - Commands: 点歌、内置语音命令处理器
//! - Services: 多音乐源解析、消息分发
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: OneBot 事件上报 Webhook + 运维接口
//! - Adapters: 网易云、下载器、silk 转码器、文件存储、OneBot 客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
