//! 应用层错误定义
//!
//! 运维接口在 HTTP 边界把端口错误收敛为 [`ApplicationError`]。
//! 点歌与内置语音的失败不经过这里，由后台任务按结构化错误直接记录。

use thiserror::Error;

use crate::application::ports::ScratchError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<ScratchError> for ApplicationError {
    fn from(err: ScratchError) -> Self {
        Self::StorageError(err.to_string())
    }
}
