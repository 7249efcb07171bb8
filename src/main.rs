//! Diange - 点歌语音插件
//!
//! 接收 OneBot 上报的消息，命中“点歌”时搜索免费曲目、下载、转码为 silk 并以语音回复。

use std::sync::Arc;

use diange::application::{
    MessageResponder, MusicProviderPort, PlayVoiceClipHandler, RequestSongHandler,
    ScratchStoragePort, TrackResolver, VoiceClipStorePort,
};
use diange::config::{load_config, print_config, AppConfig};
use diange::domain::chat::TriggerSet;
use diange::infrastructure::adapters::{
    check_tools, FileScratchStorage, FileVoiceClipStore, HttpAudioFetcher, NeteaseProvider,
    OneBotClient, SilkTranscoder,
};
use diange::infrastructure::http::{AppState, HttpServer, ServerConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},diange={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// 按配置顺序组装音乐源
fn build_providers(config: &AppConfig) -> anyhow::Result<Vec<Arc<dyn MusicProviderPort>>> {
    let mut providers: Vec<Arc<dyn MusicProviderPort>> = Vec::new();
    if config.netease.enabled {
        providers.push(Arc::new(NeteaseProvider::new(
            config.netease.to_client_config(),
        )?));
    }
    if providers.is_empty() {
        tracing::warn!("No music provider enabled, every song request will fail");
    }
    Ok(providers)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    init_tracing(&config);

    tracing::info!("Diange - 点歌语音插件");
    print_config(&config);

    // 转码配置启动后只读，每次转码显式传入
    let transcode_config = Arc::new(config.transcoder.to_transcode_config());
    for missing in check_tools(&transcode_config) {
        tracing::warn!(
            path = %missing.display(),
            "External tool not found, song requests will fail"
        );
    }

    // 清理上次异常退出遗留的请求目录
    let scratch = Arc::new(FileScratchStorage::new(&config.storage.scratch_dir).await?);
    let purged = scratch.purge_stale().await?;
    tracing::info!(purged, dir = %scratch.base_dir().display(), "Scratch storage ready");

    let clips = Arc::new(FileVoiceClipStore::new(&config.storage.voice_dir));
    for clip in &config.triggers.clips {
        if !clips.exists(&clip.file).await {
            tracing::warn!(phrase = %clip.phrase, file = %clip.file, "Voice clip file missing");
        }
    }

    // 创建适配器
    let providers = build_providers(&config)?;
    let resolver = Arc::new(TrackResolver::new(providers));
    let provider_names: Vec<String> = resolver
        .provider_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let fetcher = Arc::new(HttpAudioFetcher::new(config.fetch.to_fetcher_config())?);
    let host = Arc::new(OneBotClient::new(config.onebot.to_client_config())?);

    // 创建命令处理器
    let song_handler = RequestSongHandler::new(
        resolver,
        fetcher,
        Arc::new(SilkTranscoder::new()),
        scratch.clone(),
        host.clone(),
        transcode_config.clone(),
        config.replies.to_reply_texts(),
    );
    let clip_handler = PlayVoiceClipHandler::new(clips, host);

    let triggers = TriggerSet::new(
        &config.triggers.song_keyword,
        config.triggers.clip_triggers(),
    )?;
    let responder = Arc::new(MessageResponder::new(triggers, song_handler, clip_handler));

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(responder, scratch, transcode_config, provider_names);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
