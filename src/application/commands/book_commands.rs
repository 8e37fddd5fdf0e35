//! Book Commands

use crate::domain::book::{BookId, ChapterId};

/// 上传书籍命令
#[derive(Debug, Clone)]
pub struct UploadBook {
    /// 客户端提供的原始文件名
    pub filename: String,
    /// 可选的书名（覆盖包元数据）
    pub title: Option<String>,
    pub data: Vec<u8>,
}

/// 删除书籍命令
#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub book_id: BookId,
}

/// 生成章节摘要命令
#[derive(Debug, Clone)]
pub struct SummarizeChapter {
    pub chapter_id: ChapterId,
}
