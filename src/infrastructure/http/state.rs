//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    DeleteBookHandler, SummarizeChapterHandler, UploadBookHandler,
    // Query handlers
    GetBookChaptersHandler, GetBookHandler, GetBookOutlineHandler, GetChapterContentHandler,
    ListBooksHandler,
    // Ports
    BookRepositoryPort, SummarizerPort, UploadStoragePort,
};

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub upload_book_handler: UploadBookHandler,
    pub delete_book_handler: DeleteBookHandler,
    pub summarize_chapter_handler: SummarizeChapterHandler,

    // ========== Query Handlers ==========
    pub get_book_handler: GetBookHandler,
    pub list_books_handler: ListBooksHandler,
    pub get_book_chapters_handler: GetBookChaptersHandler,
    pub get_chapter_content_handler: GetChapterContentHandler,
    pub get_book_outline_handler: GetBookOutlineHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        storage: Arc<dyn UploadStoragePort>,
        summarizer: Arc<dyn SummarizerPort>,
        max_upload_size: u64,
    ) -> Self {
        Self {
            // Command handlers
            upload_book_handler: UploadBookHandler::new(
                book_repo.clone(),
                storage.clone(),
                max_upload_size,
            ),
            delete_book_handler: DeleteBookHandler::new(book_repo.clone(), storage.clone()),
            summarize_chapter_handler: SummarizeChapterHandler::new(book_repo.clone(), summarizer),

            // Query handlers
            get_book_handler: GetBookHandler::new(book_repo.clone()),
            list_books_handler: ListBooksHandler::new(book_repo.clone()),
            get_book_chapters_handler: GetBookChaptersHandler::new(book_repo.clone()),
            get_chapter_content_handler: GetChapterContentHandler::new(book_repo.clone()),
            get_book_outline_handler: GetBookOutlineHandler::new(book_repo, storage),
        }
    }
}
