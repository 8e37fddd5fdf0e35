//! Ping Handler

use axum::Json;
use serde::Serialize;

/// 健康检查响应（不走统一信封）
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
