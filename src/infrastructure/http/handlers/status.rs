//! Status Handler

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ApplicationError, ScratchStoragePort};
use crate::infrastructure::adapters::check_tools;
use crate::infrastructure::http::dto::{ApiResponse, ScratchUsage, StatusResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 运行状态：音乐源、外部工具、临时目录占用
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    let stats = state
        .scratch
        .get_stats()
        .await
        .map_err(ApplicationError::from)?;

    let missing_tools = check_tools(&state.transcode_config)
        .into_iter()
        .map(|p| p.display().to_string())
        .collect();

    Ok(Json(ApiResponse::success(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        providers: state.providers.clone(),
        missing_tools,
        scratch: ScratchUsage {
            workspaces: stats.workspace_count,
            files: stats.file_count,
            bytes: stats.used_bytes,
        },
    })))
}
