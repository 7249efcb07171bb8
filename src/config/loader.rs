//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `DIANGE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// 相对的外部工具路径与语音目录随后锚定到安装目录（见 [`install_dir`]）
///
/// # 环境变量示例
/// - `DIANGE_SERVER__PORT=8090`
/// - `DIANGE_ONEBOT__API_BASE_URL=http://napcat:3000`
/// - `DIANGE_ONEBOT__ACCESS_TOKEN=secret`
/// - `DIANGE_TRANSCODER__FFMPEG_PATH=/usr/bin/ffmpeg`
///
/// # 返回
/// - `Ok(AppConfig)` - 成功加载的配置
/// - `Err(ConfigError)` - 加载失败
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from_path(None)?;
    config.anchor_paths(&install_dir()?);
    Ok(config)
}

/// 安装目录（可执行文件所在目录），相对的工具与语音路径以此为准
pub fn install_dir() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe()
        .map_err(|e| ConfigError::LoadError(format!("Cannot locate executable: {}", e)))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::LoadError("Executable has no parent directory".to_string()))
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级），列表类配置由 serde 默认值提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8090)?
        .set_default("netease.enabled", true)?
        .set_default("netease.search_url", "https://music.163.com/api/search/get")?
        .set_default("netease.media_url", "https://music.163.com/song/media/outer/url")?
        .set_default("netease.search_limit", 15)?
        .set_default("netease.timeout_secs", 30)?
        .set_default("fetch.timeout_secs", 120)?
        .set_default("fetch.max_bytes", 50_u64 * 1024 * 1024)?
        .set_default("transcoder.ffmpeg_path", "music/ffmpeg")?
        .set_default("transcoder.encoder_path", "music/silk_v3_encoder")?
        .set_default("transcoder.sample_rate", 24000)?
        .set_default("transcoder.encoder_flag", "-tencent")?
        .set_default("transcoder.timeout_secs", 120)?
        .set_default("storage.scratch_dir", "data/scratch")?
        .set_default("storage.voice_dir", "voice")?
        .set_default("onebot.api_base_url", "http://127.0.0.1:5700")?
        .set_default("onebot.timeout_secs", 30)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: DIANGE_
    // 层级分隔符: __ (双下划线)
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("DIANGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(invalid("Server port cannot be 0"));
    }

    if config.netease.search_url.is_empty() || config.netease.media_url.is_empty() {
        return Err(invalid("NetEase search/media URL cannot be empty"));
    }

    if config.transcoder.ffmpeg_path.as_os_str().is_empty()
        || config.transcoder.encoder_path.as_os_str().is_empty()
    {
        return Err(invalid("Transcoder tool paths cannot be empty"));
    }

    if config.transcoder.sample_rate == 0 {
        return Err(invalid("Sample rate cannot be 0"));
    }

    if config.triggers.song_keyword.trim().is_empty() {
        return Err(invalid("Song keyword cannot be empty"));
    }

    if config
        .triggers
        .clips
        .iter()
        .any(|c| c.phrase.is_empty() || c.file.is_empty())
    {
        return Err(invalid("Voice clip phrase and file cannot be empty"));
    }

    if config.onebot.api_base_url.is_empty() {
        return Err(invalid("OneBot API URL cannot be empty"));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("NetEase Enabled: {}", config.netease.enabled);
    tracing::info!("NetEase Search URL: {}", config.netease.search_url);
    tracing::info!("NetEase Media URL: {}", config.netease.media_url);
    tracing::info!("Download Limit: {} bytes", config.fetch.max_bytes);
    tracing::info!("FFmpeg: {:?}", config.transcoder.ffmpeg_path);
    tracing::info!("Silk Encoder: {:?}", config.transcoder.encoder_path);
    tracing::info!(
        "Sample Rate: {} Hz, Flag: {:?}",
        config.transcoder.sample_rate,
        config.transcoder.encoder_flag
    );
    tracing::info!("Scratch Directory: {:?}", config.storage.scratch_dir);
    tracing::info!("Voice Directory: {:?}", config.storage.voice_dir);
    tracing::info!("OneBot API: {}", config.onebot.api_base_url);
    tracing::info!(
        "OneBot Token: {}",
        if config.onebot.access_token.as_deref().map_or(true, str::is_empty) {
            "none"
        } else {
            "set"
        }
    );
    tracing::info!("Song Keyword: {}", config.triggers.song_keyword);
    for clip in &config.triggers.clips {
        tracing::info!("Voice Clip: {} -> {}", clip.phrase, clip.file);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
