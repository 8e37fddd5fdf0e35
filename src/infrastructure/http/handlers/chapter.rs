//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GetChapterContent, SummarizeChapter};
use crate::domain::book::ChapterId;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChapterIdRequest {
    pub id: ChapterId,
}

#[derive(Debug, Serialize)]
pub struct ChapterContentResponse {
    pub id: ChapterId,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub id: ChapterId,
    pub summary: String,
}

/// 获取章节正文
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterIdRequest>,
) -> Result<Json<ApiResponse<ChapterContentResponse>>, ApiError> {
    let result = state
        .get_chapter_content_handler
        .handle(GetChapterContent { chapter_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(ChapterContentResponse {
        id: result.id,
        title: result.title,
        content: result.content,
        summary: result.summary,
    })))
}

/// 生成章节摘要
pub async fn summarize_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterIdRequest>,
) -> Result<Json<ApiResponse<SummaryResponse>>, ApiError> {
    let result = state
        .summarize_chapter_handler
        .handle(SummarizeChapter { chapter_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(SummaryResponse {
        id: result.chapter_id,
        summary: result.summary,
    })))
}
