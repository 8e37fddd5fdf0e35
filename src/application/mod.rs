//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（BookRepository、UploadStorage、Summarizer）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        DeleteBookHandler, SummarizeChapterHandler, SummarizeChapterResponse, UploadBookHandler,
        UploadBookResponse,
    },
    DeleteBook, SummarizeChapter, UploadBook,
};

pub use error::ApplicationError;

pub use ports::{
    BookRecord, BookRepositoryPort, ChapterRecord, NewBook, RepositoryError, StorageError,
    SummarizerPort, SummaryError, UploadStoragePort,
};

pub use queries::{
    handlers::{
        BookResponse, ChapterContentResponse, ChapterListItem, GetBookChaptersHandler,
        GetBookHandler, GetBookOutlineHandler, GetChapterContentHandler, ListBooksHandler,
        OutlineEntry, OutlineResponse,
    },
    GetBook, GetBookChapters, GetBookOutline, GetChapterContent, ListBooks,
};
