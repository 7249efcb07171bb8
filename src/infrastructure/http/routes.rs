//! HTTP Routes
//!
//! Endpoints:
//! - /onebot/event   POST  OneBot v11 事件上报
//! - /api/ping       GET   健康检查
//! - /api/status     GET   运行状态

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/onebot/event", post(handlers::onebot_event))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/status", get(handlers::status))
}
