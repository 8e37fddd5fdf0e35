//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping               GET   健康检查
//! - /api/book/upload        POST  上传 EPUB（multipart: file, title?）并抽取章节
//! - /api/book/outline       POST  重新打开已存储的包，返回仅标题目录
//! - /api/book/list          GET   列出所有书籍
//! - /api/book/get           POST  获取书籍详情
//! - /api/book/delete        POST  删除书籍（章节和文件一并删除）
//! - /api/book/chapters      POST  获取书籍章节列表
//! - /api/chapter/get        POST  获取章节正文和摘要
//! - /api/chapter/summarize  POST  生成并保存章节摘要

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/book", book_routes())
        .nest("/chapter", chapter_routes())
}

/// Book 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_book))
        .route("/outline", post(handlers::get_book_outline))
        .route("/list", get(handlers::list_books))
        .route("/get", post(handlers::get_book))
        .route("/delete", post(handlers::delete_book))
        .route("/chapters", post(handlers::get_book_chapters))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_chapter))
        .route("/summarize", post(handlers::summarize_chapter))
}
