//! Book Queries

use crate::domain::book::{BookId, ChapterId};

/// 获取书籍详情查询
#[derive(Debug, Clone)]
pub struct GetBook {
    pub book_id: BookId,
}

/// 列出所有书籍查询
#[derive(Debug, Clone)]
pub struct ListBooks;

/// 获取书籍章节列表查询
#[derive(Debug, Clone)]
pub struct GetBookChapters {
    pub book_id: BookId,
}

/// 获取章节正文查询
#[derive(Debug, Clone)]
pub struct GetChapterContent {
    pub chapter_id: ChapterId,
}

/// 重新打开已存储的包，按仅标题模式抽取目录
#[derive(Debug, Clone)]
pub struct GetBookOutline {
    pub book_id: BookId,
}
