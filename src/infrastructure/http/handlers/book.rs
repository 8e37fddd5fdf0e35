//! Book HTTP Handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{
    ChapterListItem, DeleteBook, GetBook, GetBookChapters, GetBookOutline, ListBooks, UploadBook,
};
use crate::domain::book::{BookId, ChapterId};
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::application::BookResponse> for BookResponse {
    fn from(book: crate::application::BookResponse) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookUploadResponse {
    pub book_id: BookId,
    pub filename: String,
    pub title: String,
    pub chapters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookIdRequest {
    pub id: BookId,
}

#[derive(Debug, Deserialize)]
pub struct BookChaptersRequest {
    pub book_id: BookId,
}

#[derive(Debug, Serialize)]
pub struct ChapterItemResponse {
    pub id: ChapterId,
    pub book_id: BookId,
    pub title: String,
    pub order: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterListItem> for ChapterItemResponse {
    fn from(item: ChapterListItem) -> Self {
        Self {
            id: item.id,
            book_id: item.book_id,
            title: item.title,
            order: item.order,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutlineEntryResponse {
    pub title: String,
    pub order: usize,
}

#[derive(Debug, Serialize)]
pub struct OutlineResponse {
    pub book_id: BookId,
    pub chapters: Vec<OutlineEntryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 上传 EPUB 文件，抽取章节后保存
pub async fn upload_book(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<BookUploadResponse>>, ApiError> {
    let mut title: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read title: {}", e)))?,
                );
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::BadRequest("Filename is required".to_string()))?;

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;

    let result = state
        .upload_book_handler
        .handle(UploadBook {
            filename,
            title,
            data,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookUploadResponse {
        book_id: result.book_id,
        filename: result.filename,
        title: result.title,
        chapters: result.chapters,
        warning: result.warning,
    })))
}

/// 仅标题目录（目录优先，标题扫描回退）
pub async fn get_book_outline(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookIdRequest>,
) -> Result<Json<ApiResponse<OutlineResponse>>, ApiError> {
    let result = state
        .get_book_outline_handler
        .handle(GetBookOutline { book_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(OutlineResponse {
        book_id: result.book_id,
        chapters: result
            .chapters
            .into_iter()
            .map(|c| OutlineEntryResponse {
                title: c.title,
                order: c.order,
            })
            .collect(),
        warning: result.warning,
    })))
}

/// 获取书籍列表
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BookResponse>>>, ApiError> {
    let result = state.list_books_handler.handle(ListBooks).await?;

    Ok(Json(ApiResponse::success(
        result.into_iter().map(BookResponse::from).collect(),
    )))
}

/// 获取书籍详情
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookIdRequest>,
) -> Result<Json<ApiResponse<BookResponse>>, ApiError> {
    let result = state
        .get_book_handler
        .handle(GetBook { book_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(BookResponse::from(result))))
}

/// 删除书籍
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_book_handler
        .handle(DeleteBook { book_id: req.id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 获取书籍章节列表（不含正文）
pub async fn get_book_chapters(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookChaptersRequest>,
) -> Result<Json<ApiResponse<Vec<ChapterItemResponse>>>, ApiError> {
    let result = state
        .get_book_chapters_handler
        .handle(GetBookChapters {
            book_id: req.book_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        result.into_iter().map(ChapterItemResponse::from).collect(),
    )))
}
