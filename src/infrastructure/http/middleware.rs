//! HTTP Middleware
//!
//! 按 HTTP 状态码记录失败请求。业务错误（errno != 0）仍返回 200，
//! 在 ApiError::into_response() 中记录。

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

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
    } else if status == StatusCode::PAYLOAD_TOO_LARGE {
        // DefaultBodyLimit 由提取器直接拒绝
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "Request body exceeds upload limit"
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
