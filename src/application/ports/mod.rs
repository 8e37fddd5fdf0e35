//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod repositories;
mod summarizer;
mod upload_storage;

pub use repositories::{BookRecord, BookRepositoryPort, ChapterRecord, NewBook, RepositoryError};
pub use summarizer::{SummarizerPort, SummaryError};
pub use upload_storage::{StorageError, UploadStoragePort};
