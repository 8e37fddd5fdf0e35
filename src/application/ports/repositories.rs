//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::book::{BookId, Chapter, ChapterId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Book Repository
// ============================================================================

/// 待保存的书籍（ID 由存储层分配）
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub file_path: PathBuf,
}

/// 书籍实体（用于持久化）
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub file_path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: ChapterId,
    pub book_id: BookId,
    pub title: String,
    pub content: Option<String>,
    pub order: usize,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book Repository Port
#[async_trait]
pub trait BookRepositoryPort: Send + Sync {
    /// 在同一事务中保存书籍及其全部章节
    async fn create_with_chapters(
        &self,
        book: &NewBook,
        chapters: &[Chapter],
    ) -> Result<BookRecord, RepositoryError>;

    /// 根据 ID 查找书籍
    async fn find_by_id(&self, id: BookId) -> Result<Option<BookRecord>, RepositoryError>;

    /// 获取所有书籍
    async fn find_all(&self) -> Result<Vec<BookRecord>, RepositoryError>;

    /// 删除书籍（章节级联删除）
    async fn delete(&self, id: BookId) -> Result<(), RepositoryError>;

    /// 获取书籍的所有章节，按顺序排列
    async fn find_chapters(&self, book_id: BookId) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_chapter(&self, id: ChapterId) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 保存章节摘要
    async fn update_summary(&self, id: ChapterId, summary: &str) -> Result<(), RepositoryError>;
}
