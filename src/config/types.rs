//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::application::{ReplyTexts, TranscodeConfig};
use crate::domain::chat::ClipTrigger;
use crate::infrastructure::adapters::{HttpFetcherConfig, NeteaseConfig, OneBotConfig};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置（接收 OneBot 上报）
    #[serde(default)]
    pub server: ServerConfig,

    /// 网易云音乐配置
    #[serde(default)]
    pub netease: NeteaseSection,

    /// 下载配置
    #[serde(default)]
    pub fetch: FetchSection,

    /// 转码工具配置
    #[serde(default)]
    pub transcoder: TranscoderSection,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// OneBot API 配置
    #[serde(default)]
    pub onebot: OneBotSection,

    /// 触发词配置
    #[serde(default)]
    pub triggers: TriggersConfig,

    /// 回复文案配置
    #[serde(default)]
    pub replies: RepliesConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 把相对的外部工具路径与语音目录锚定到安装目录，绝对路径保持不变
    pub fn anchor_paths(&mut self, install_dir: &Path) {
        anchor(&mut self.transcoder.ffmpeg_path, install_dir);
        anchor(&mut self.transcoder.encoder_path, install_dir);
        anchor(&mut self.storage.voice_dir, install_dir);
    }
}

fn anchor(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 网易云音乐配置
#[derive(Debug, Clone, Deserialize)]
pub struct NeteaseSection {
    /// 是否加入音乐源列表
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 搜索接口
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// 外链接口
    #[serde(default = "default_media_url")]
    pub media_url: String,

    /// 每次搜索的候选数量
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// 请求超时时间（秒）
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_true() -> bool {
    true
}

fn default_search_url() -> String {
    "https://music.163.com/api/search/get".to_string()
}

fn default_media_url() -> String {
    "https://music.163.com/song/media/outer/url".to_string()
}

fn default_search_limit() -> u32 {
    15
}

fn default_api_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()
}

impl Default for NeteaseSection {
    fn default() -> Self {
        Self {
            enabled: true,
            search_url: default_search_url(),
            media_url: default_media_url(),
            search_limit: default_search_limit(),
            timeout_secs: default_api_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl NeteaseSection {
    pub fn to_client_config(&self) -> NeteaseConfig {
        NeteaseConfig {
            search_url: self.search_url.clone(),
            media_url: self.media_url.clone(),
            search_limit: self.search_limit,
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// 下载配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSection {
    /// 请求超时时间（秒）
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// 单次下载上限（字节），默认 50MB
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_timeout() -> u64 {
    120
}

fn default_max_bytes() -> u64 {
    50 * 1024 * 1024 // 50 MB
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchSection {
    pub fn to_fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            timeout_secs: self.timeout_secs,
            max_bytes: self.max_bytes,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// 转码工具配置
#[derive(Debug, Clone, Deserialize)]
pub struct TranscoderSection {
    /// ffmpeg 路径
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// silk 编码器路径
    #[serde(default = "default_encoder_path")]
    pub encoder_path: PathBuf,

    /// 采样率（Hz）
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 编码器兼容参数，留空则不传
    #[serde(default = "default_encoder_flag")]
    pub encoder_flag: String,

    /// 单个外部进程超时（秒）
    #[serde(default = "default_transcode_timeout")]
    pub timeout_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("music/ffmpeg")
}

fn default_encoder_path() -> PathBuf {
    PathBuf::from("music/silk_v3_encoder")
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_encoder_flag() -> String {
    "-tencent".to_string()
}

fn default_transcode_timeout() -> u64 {
    120
}

impl Default for TranscoderSection {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            encoder_path: default_encoder_path(),
            sample_rate: default_sample_rate(),
            encoder_flag: default_encoder_flag(),
            timeout_secs: default_transcode_timeout(),
        }
    }
}

impl TranscoderSection {
    pub fn to_transcode_config(&self) -> TranscodeConfig {
        TranscodeConfig {
            ffmpeg_path: self.ffmpeg_path.clone(),
            encoder_path: self.encoder_path.clone(),
            sample_rate: self.sample_rate,
            encoder_flag: self.encoder_flag.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 请求级临时目录根
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// 内置语音目录
    #[serde(default = "default_voice_dir")]
    pub voice_dir: PathBuf,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("data/scratch")
}

fn default_voice_dir() -> PathBuf {
    PathBuf::from("voice")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            voice_dir: default_voice_dir(),
        }
    }
}

/// OneBot API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct OneBotSection {
    /// HTTP API 地址
    #[serde(default = "default_onebot_url")]
    pub api_base_url: String,

    /// access_token
    #[serde(default)]
    pub access_token: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

fn default_onebot_url() -> String {
    "http://127.0.0.1:5700".to_string()
}

impl Default for OneBotSection {
    fn default() -> Self {
        Self {
            api_base_url: default_onebot_url(),
            access_token: None,
            timeout_secs: default_api_timeout(),
        }
    }
}

impl OneBotSection {
    pub fn to_client_config(&self) -> OneBotConfig {
        OneBotConfig {
            api_base_url: self.api_base_url.clone(),
            access_token: self.access_token.clone().filter(|t| !t.is_empty()),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// 内置语音触发
#[derive(Debug, Clone, Deserialize)]
pub struct ClipConfig {
    /// 整句触发短语
    pub phrase: String,
    /// 语音目录下的文件名
    pub file: String,
}

/// 触发词配置
#[derive(Debug, Clone, Deserialize)]
pub struct TriggersConfig {
    /// 点歌关键词
    #[serde(default = "default_song_keyword")]
    pub song_keyword: String,

    /// 内置语音
    #[serde(default = "default_clips")]
    pub clips: Vec<ClipConfig>,
}

fn default_song_keyword() -> String {
    "点歌".to_string()
}

fn default_clips() -> Vec<ClipConfig> {
    vec![
        ClipConfig {
            phrase: "乓啪咔乓乓乓".to_string(),
            file: "200.silk".to_string(),
        },
        ClipConfig {
            phrase: "唱歌".to_string(),
            file: "sing.silk".to_string(),
        },
    ]
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            song_keyword: default_song_keyword(),
            clips: default_clips(),
        }
    }
}

impl TriggersConfig {
    pub fn clip_triggers(&self) -> Vec<ClipTrigger> {
        self.clips
            .iter()
            .map(|c| ClipTrigger {
                phrase: c.phrase.clone(),
                file: c.file.clone(),
            })
            .collect()
    }
}

/// 回复文案配置
#[derive(Debug, Clone, Deserialize)]
pub struct RepliesConfig {
    #[serde(default = "default_song_not_found")]
    pub song_not_found: String,

    #[serde(default = "default_link_unavailable")]
    pub link_unavailable: String,
}

fn default_song_not_found() -> String {
    ReplyTexts::default().song_not_found
}

fn default_link_unavailable() -> String {
    ReplyTexts::default().link_unavailable
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            song_not_found: default_song_not_found(),
            link_unavailable: default_link_unavailable(),
        }
    }
}

impl RepliesConfig {
    pub fn to_reply_texts(&self) -> ReplyTexts {
        ReplyTexts {
            song_not_found: self.song_not_found.clone(),
            link_unavailable: self.link_unavailable.clone(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.triggers.song_keyword, "点歌");
        assert_eq!(config.triggers.clips.len(), 2);
        assert_eq!(config.replies.song_not_found, "未找到该歌曲");
        assert_eq!(config.fetch.max_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_transcode_config_matches_section() {
        let config = TranscoderSection::default().to_transcode_config();
        assert_eq!(config.ffmpeg_path, PathBuf::from("music/ffmpeg"));
        assert_eq!(config.encoder_path, PathBuf::from("music/silk_v3_encoder"));
        assert_eq!(config.sample_rate, 24000);
        assert_eq!(config.encoder_flag, "-tencent");
    }

    #[test]
    fn test_anchor_paths_resolves_against_install_dir() {
        let mut config = AppConfig::default();
        config.transcoder.ffmpeg_path = PathBuf::from("/usr/bin/ffmpeg");
        config.anchor_paths(Path::new("/opt/diange"));

        assert_eq!(config.transcoder.ffmpeg_path, PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(
            config.transcoder.encoder_path,
            PathBuf::from("/opt/diange/music/silk_v3_encoder")
        );
        assert_eq!(config.storage.voice_dir, PathBuf::from("/opt/diange/voice"));
        assert_eq!(config.storage.scratch_dir, PathBuf::from("data/scratch"));

        let tools = config.transcoder.to_transcode_config();
        assert_eq!(tools.encoder_path, PathBuf::from("/opt/diange/music/silk_v3_encoder"));
    }

    #[test]
    fn test_empty_access_token_is_ignored() {
        let section = OneBotSection {
            access_token: Some(String::new()),
            ..OneBotSection::default()
        };
        assert_eq!(section.to_client_config().access_token, None);
    }
}
