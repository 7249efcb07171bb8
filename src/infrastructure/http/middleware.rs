//! HTTP Middleware
//!
//! 记录 4xx/5xx 响应及耗时

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// OneBot 上报路径
const EVENT_PATH: &str = "/onebot/event";

/// HTTP 状态码错误日志中间件
///
/// 业务错误（errno != 0）在 ApiError::into_response() 中记录。
/// 上报入口的 4xx 多为宿主推送了无法解析的事件，单独标注。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() && uri.path() == EVENT_PATH {
        tracing::warn!(
            status = status.as_u16(),
            elapsed_ms,
            "Rejected malformed OneBot event"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use tower::util::ServiceExt;

    async fn event_handler(Json(_event): Json<serde_json::Value>) -> StatusCode {
        StatusCode::NO_CONTENT
    }

    async fn error_handler() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn create_test_router() -> Router {
        Router::new()
            .route(EVENT_PATH, post(event_handler))
            .route("/error", get(error_handler))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    #[tokio::test]
    async fn test_passes_response_through() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri(EVENT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"post_type":"meta_event"}"#))
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_malformed_event_is_client_error() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri(EVENT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_server_error_passes_through() {
        let request = HttpRequest::builder()
            .uri("/error")
            .body(Body::empty())
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
