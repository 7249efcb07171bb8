//! Application State
//!
//! Webhook 与状态接口共享的只读状态

use std::sync::Arc;

use crate::application::{ScratchStoragePort, SharedResponder, TranscodeConfig};

/// 应用状态
pub struct AppState {
    /// 消息触发与分发
    pub responder: SharedResponder,
    pub scratch: Arc<dyn ScratchStoragePort>,
    pub transcode_config: Arc<TranscodeConfig>,
    /// 按尝试顺序排列的音乐源名称
    pub providers: Vec<String>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        responder: SharedResponder,
        scratch: Arc<dyn ScratchStoragePort>,
        transcode_config: Arc<TranscodeConfig>,
        providers: Vec<String>,
    ) -> Self {
        Self {
            responder,
            scratch,
            transcode_config,
            providers,
        }
    }
}
