//! Book Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookRecord, BookRepositoryPort, ChapterRecord, UploadStoragePort};
use crate::application::queries::{GetBook, GetBookChapters, GetBookOutline, GetChapterContent, ListBooks};
use crate::domain::book::{BookId, ChapterId};
use crate::domain::epub::Package;
use crate::domain::{extract_chapter_titles, Extraction};

// ============================================================================
// Response DTOs
// ============================================================================

/// 书籍详情响应
#[derive(Debug, Clone)]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BookRecord> for BookResponse {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 章节列表项（不含正文）
#[derive(Debug, Clone)]
pub struct ChapterListItem {
    pub id: ChapterId,
    pub book_id: BookId,
    pub title: String,
    pub order: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterRecord> for ChapterListItem {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            title: record.title,
            order: record.order,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 章节正文响应
#[derive(Debug, Clone)]
pub struct ChapterContentResponse {
    pub id: ChapterId,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
}

impl From<ChapterRecord> for ChapterContentResponse {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            summary: record.summary,
        }
    }
}

/// 目录条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub order: usize,
}

/// 目录响应
#[derive(Debug, Clone)]
pub struct OutlineResponse {
    pub book_id: BookId,
    pub chapters: Vec<OutlineEntry>,
    pub warning: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetBook Handler
pub struct GetBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: GetBook) -> Result<BookResponse, ApplicationError> {
        let book = self
            .book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id.as_i64()))?;

        Ok(BookResponse::from(book))
    }
}

/// ListBooks Handler
pub struct ListBooksHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl ListBooksHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, _query: ListBooks) -> Result<Vec<BookResponse>, ApplicationError> {
        let books = self.book_repo.find_all().await?;
        Ok(books.into_iter().map(BookResponse::from).collect())
    }
}

/// GetBookChapters Handler
pub struct GetBookChaptersHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetBookChaptersHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: GetBookChapters) -> Result<Vec<ChapterListItem>, ApplicationError> {
        self.book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id.as_i64()))?;

        let chapters = self.book_repo.find_chapters(query.book_id).await?;
        Ok(chapters.into_iter().map(ChapterListItem::from).collect())
    }
}

/// GetChapterContent Handler
pub struct GetChapterContentHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetChapterContentHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: GetChapterContent) -> Result<ChapterContentResponse, ApplicationError> {
        let chapter = self
            .book_repo
            .find_chapter(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id.as_i64()))?;

        Ok(ChapterContentResponse::from(chapter))
    }
}

/// GetBookOutline Handler
pub struct GetBookOutlineHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    storage: Arc<dyn UploadStoragePort>,
}

impl GetBookOutlineHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>, storage: Arc<dyn UploadStoragePort>) -> Self {
        Self { book_repo, storage }
    }

    pub async fn handle(&self, query: GetBookOutline) -> Result<OutlineResponse, ApplicationError> {
        let book = self
            .book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id.as_i64()))?;

        let data = self.storage.read(&book.file_path).await?;

        let extraction = tokio::task::spawn_blocking(move || -> Result<Extraction, ApplicationError> {
            let package = Package::from_bytes(data)?;
            Ok(extract_chapter_titles(&package))
        })
        .await
        .map_err(|e| ApplicationError::internal(format!("Extraction task failed: {}", e)))??;

        Ok(OutlineResponse {
            book_id: book.id,
            warning: extraction.warning().map(|w| w.to_string()),
            chapters: extraction
                .into_chapters()
                .into_iter()
                .map(|c| OutlineEntry {
                    order: c.order(),
                    title: c.title().to_string(),
                })
                .collect(),
        })
    }
}
