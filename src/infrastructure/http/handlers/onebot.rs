//! OneBot Event Handler
//!
//! 命中触发词时立即返回 `{"block": true}` 阻止宿主继续处理，
//! 点歌流水线在后台任务中执行；未命中返回 204。

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::ResponseOutcome;
use crate::infrastructure::http::dto::{OneBotEvent, QuickOperation};
use crate::infrastructure::http::state::AppState;

/// OneBot 事件上报入口
pub async fn onebot_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<OneBotEvent>,
) -> Response {
    let Some(message) = event.into_incoming() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let Some(trigger) = state.responder.classify(&message.text) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    tracing::debug!(
        reply_to = %message.reply_to,
        sender = %message.sender_id,
        trigger = ?trigger,
        "Trigger matched"
    );

    let responder = state.responder.clone();
    tokio::spawn(async move {
        match responder.dispatch(trigger, message.reply_to).await {
            ResponseOutcome::Song(Err(e)) => tracing::debug!(
                error = ?e,
                reply_kind = ?e.reply_kind(),
                "Song request ended with failure"
            ),
            ResponseOutcome::Clip(Err(e)) => {
                tracing::debug!(error = ?e, "Voice clip ended with failure")
            }
            ResponseOutcome::Song(Ok(_)) | ResponseOutcome::Clip(Ok(())) => {}
        }
    });

    Json(QuickOperation::block()).into_response()
}
