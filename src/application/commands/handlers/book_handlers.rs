//! Book Command Handlers

use std::path::Path;
use std::sync::Arc;

use crate::application::commands::{DeleteBook, SummarizeChapter, UploadBook};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookRepositoryPort, NewBook, SummarizerPort, UploadStoragePort,
};
use crate::domain::book::{BookId, ChapterId};
use crate::domain::epub::{Package, PackageMetadata};
use crate::domain::{extract_titled_chapters, Extraction};

const EPUB_EXTENSION: &str = "epub";

// ============================================================================
// UploadBook
// ============================================================================

/// 上传响应
#[derive(Debug, Clone)]
pub struct UploadBookResponse {
    pub book_id: BookId,
    pub filename: String,
    pub title: String,
    pub chapters: Vec<String>,
    /// 没有抽取到任何章节时的提示
    pub warning: Option<String>,
}

/// UploadBook Handler
///
/// 校验 → 存储 → 后台线程抽取 → 单事务保存书籍和章节
pub struct UploadBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    storage: Arc<dyn UploadStoragePort>,
    max_upload_size: u64,
}

impl UploadBookHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        storage: Arc<dyn UploadStoragePort>,
        max_upload_size: u64,
    ) -> Self {
        Self {
            book_repo,
            storage,
            max_upload_size,
        }
    }

    pub async fn handle(&self, command: UploadBook) -> Result<UploadBookResponse, ApplicationError> {
        validate_upload(&command, self.max_upload_size)?;

        let UploadBook {
            filename,
            title,
            data,
        } = command;

        let file_path = self.storage.save(&data).await?;

        let (metadata, extraction) = match extract_in_background(data).await {
            Ok(result) => result,
            Err(e) => {
                self.discard(&file_path).await;
                return Err(e);
            }
        };

        let title = choose_title(title.as_deref(), &metadata, &filename);
        let author = (!metadata.authors.is_empty()).then(|| metadata.authors.join(", "));

        let new_book = NewBook {
            title: title.clone(),
            author,
            file_path: file_path.clone(),
        };

        let book = match self
            .book_repo
            .create_with_chapters(&new_book, extraction.chapters())
            .await
        {
            Ok(book) => book,
            Err(e) => {
                self.discard(&file_path).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            book_id = %book.id,
            title = %book.title,
            chapters = extraction.len(),
            "Book saved"
        );

        Ok(UploadBookResponse {
            book_id: book.id,
            filename,
            title,
            chapters: extraction
                .chapters()
                .iter()
                .map(|c| c.title().to_string())
                .collect(),
            warning: extraction.warning().map(|w| w.to_string()),
        })
    }

    async fn discard(&self, path: &Path) {
        if let Err(e) = self.storage.delete(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored upload");
        }
    }
}

fn validate_upload(command: &UploadBook, max_upload_size: u64) -> Result<(), ApplicationError> {
    let is_epub = Path::new(&command.filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EPUB_EXTENSION));
    if !is_epub {
        return Err(ApplicationError::validation(
            "Invalid file type. Only EPUB files are allowed.",
        ));
    }

    if command.data.is_empty() {
        return Err(ApplicationError::validation("Uploaded file is empty"));
    }

    if command.data.len() as u64 > max_upload_size {
        return Err(ApplicationError::validation(format!(
            "File too large: {} bytes (limit {} bytes)",
            command.data.len(),
            max_upload_size
        )));
    }

    Ok(())
}

/// 书名优先级：请求参数 > 包元数据 > 文件名
fn choose_title(requested: Option<&str>, metadata: &PackageMetadata, filename: &str) -> String {
    requested
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| metadata.title.as_deref().map(str::trim).filter(|t| !t.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| {
            Path::new(filename)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| filename.to_string())
        })
}

/// CPU 密集的抽取放到阻塞线程池
async fn extract_in_background(
    data: Vec<u8>,
) -> Result<(PackageMetadata, Extraction), ApplicationError> {
    tokio::task::spawn_blocking(move || -> Result<(PackageMetadata, Extraction), ApplicationError> {
        let package = Package::from_bytes(data)?;
        Ok((package.metadata().clone(), extract_titled_chapters(&package)))
    })
    .await
    .map_err(|e| ApplicationError::internal(format!("Extraction task failed: {}", e)))?
}

// ============================================================================
// DeleteBook
// ============================================================================

/// DeleteBook Handler
pub struct DeleteBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    storage: Arc<dyn UploadStoragePort>,
}

impl DeleteBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>, storage: Arc<dyn UploadStoragePort>) -> Self {
        Self { book_repo, storage }
    }

    pub async fn handle(&self, command: DeleteBook) -> Result<(), ApplicationError> {
        let book_id = command.book_id;

        let book = self
            .book_repo
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", book_id.as_i64()))?;

        self.book_repo.delete(book_id).await?;

        if let Err(e) = self.storage.delete(&book.file_path).await {
            tracing::warn!(book_id = %book_id, error = %e, "Failed to remove book file");
        }

        tracing::info!(book_id = %book_id, title = %book.title, "Book deleted");

        Ok(())
    }
}

// ============================================================================
// SummarizeChapter
// ============================================================================

/// 摘要响应
#[derive(Debug, Clone)]
pub struct SummarizeChapterResponse {
    pub chapter_id: ChapterId,
    pub summary: String,
}

/// SummarizeChapter Handler
pub struct SummarizeChapterHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    summarizer: Arc<dyn SummarizerPort>,
}

impl SummarizeChapterHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>, summarizer: Arc<dyn SummarizerPort>) -> Self {
        Self {
            book_repo,
            summarizer,
        }
    }

    pub async fn handle(
        &self,
        command: SummarizeChapter,
    ) -> Result<SummarizeChapterResponse, ApplicationError> {
        let chapter_id = command.chapter_id;

        let chapter = self
            .book_repo
            .find_chapter(chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id.as_i64()))?;

        let content = chapter
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApplicationError::validation("Chapter has no content to summarize"))?;

        let summary = self.summarizer.summarize(content).await?;
        self.book_repo.update_summary(chapter_id, &summary).await?;

        tracing::info!(
            chapter_id = %chapter_id,
            summary_chars = summary.chars().count(),
            "Summary generated"
        );

        Ok(SummarizeChapterResponse {
            chapter_id,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::epub::fixtures::EpubBuilder;
    use crate::infrastructure::adapters::{FileUploadStorage, FixedSummarizer};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteBookRepository,
    };
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        repo: Arc<SqliteBookRepository>,
        storage: Arc<FileUploadStorage>,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let storage = FileUploadStorage::new(dir.path().join("uploads")).await.unwrap();
        Fixture {
            _dir: dir,
            repo: Arc::new(SqliteBookRepository::new(pool)),
            storage: Arc::new(storage),
        }
    }

    fn upload_handler(f: &Fixture) -> UploadBookHandler {
        UploadBookHandler::new(f.repo.clone(), f.storage.clone(), 1024 * 1024)
    }

    fn sample_epub() -> Vec<u8> {
        EpubBuilder::new()
            .title("Sample Book")
            .author("Jane Doe")
            .document("doc1", "<h1>Intro</h1><p>Hello world</p>")
            .document("doc2", "<p>No heading here</p>")
            .build()
    }

    #[tokio::test]
    async fn test_upload_saves_book_and_chapters() {
        let f = fixture().await;
        let handler = upload_handler(&f);

        let response = handler
            .handle(UploadBook {
                filename: "sample.EPUB".to_string(),
                title: None,
                data: sample_epub(),
            })
            .await
            .unwrap();

        assert_eq!(response.title, "Sample Book");
        assert_eq!(response.chapters, vec!["Intro", "doc2"]);
        assert_eq!(response.warning, None);

        let book = f.repo.find_by_id(response.book_id).await.unwrap().unwrap();
        assert_eq!(book.author.as_deref(), Some("Jane Doe"));
        assert!(book.file_path.exists());

        let chapters = f.repo.find_chapters(response.book_id).await.unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].order, 1);
        assert_eq!(chapters[0].content.as_deref(), Some("Hello world"));
        assert_eq!(chapters[1].title, "doc2");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_epub() {
        let f = fixture().await;
        let err = upload_handler(&f)
            .handle(UploadBook {
                filename: "notes.txt".to_string(),
                title: None,
                data: b"hello".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let f = fixture().await;
        let handler = UploadBookHandler::new(f.repo.clone(), f.storage.clone(), 16);

        let err = handler
            .handle(UploadBook {
                filename: "big.epub".to_string(),
                title: None,
                data: sample_epub(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_unreadable_package_removes_stored_file() {
        let f = fixture().await;
        let err = upload_handler(&f)
            .handle(UploadBook {
                filename: "broken.epub".to_string(),
                title: None,
                data: b"definitely not a zip".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::UnreadablePackage(_)));
        assert!(f.repo.find_all().await.unwrap().is_empty());

        let mut entries = tokio::fs::read_dir(f.storage.base_dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_extraction_is_saved_with_warning() {
        let f = fixture().await;
        let data = EpubBuilder::new()
            .document("only", "<h2>Only Title</h2>")
            .build();

        let response = upload_handler(&f)
            .handle(UploadBook {
                filename: "empty.epub".to_string(),
                title: Some("  Custom  ".to_string()),
                data,
            })
            .await
            .unwrap();

        assert_eq!(response.title, "Custom");
        assert!(response.chapters.is_empty());
        assert!(response.warning.is_some());
        assert!(f.repo.find_by_id(response.book_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_title_falls_back_to_file_stem() {
        let f = fixture().await;
        let data = EpubBuilder::new().document("a", "<p>text</p>").build();

        let response = upload_handler(&f)
            .handle(UploadBook {
                filename: "my-book.epub".to_string(),
                title: None,
                data,
            })
            .await
            .unwrap();

        assert_eq!(response.title, "my-book");
    }

    #[tokio::test]
    async fn test_delete_book_removes_file_and_rows() {
        let f = fixture().await;
        let response = upload_handler(&f)
            .handle(UploadBook {
                filename: "sample.epub".to_string(),
                title: None,
                data: sample_epub(),
            })
            .await
            .unwrap();
        let book = f.repo.find_by_id(response.book_id).await.unwrap().unwrap();

        let handler = DeleteBookHandler::new(f.repo.clone(), f.storage.clone());
        handler
            .handle(DeleteBook {
                book_id: response.book_id,
            })
            .await
            .unwrap();

        assert!(f.repo.find_by_id(response.book_id).await.unwrap().is_none());
        assert!(f.repo.find_chapters(response.book_id).await.unwrap().is_empty());
        assert!(!book.file_path.exists());

        let err = handler
            .handle(DeleteBook {
                book_id: response.book_id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_summarize_chapter_stores_summary() {
        let f = fixture().await;
        let response = upload_handler(&f)
            .handle(UploadBook {
                filename: "sample.epub".to_string(),
                title: None,
                data: sample_epub(),
            })
            .await
            .unwrap();
        let chapters = f.repo.find_chapters(response.book_id).await.unwrap();

        let handler = SummarizeChapterHandler::new(
            f.repo.clone(),
            Arc::new(FixedSummarizer::new("A short summary.")),
        );
        let result = handler
            .handle(SummarizeChapter {
                chapter_id: chapters[0].id,
            })
            .await
            .unwrap();

        assert_eq!(result.summary, "A short summary.");
        let stored = f.repo.find_chapter(chapters[0].id).await.unwrap().unwrap();
        assert_eq!(stored.summary.as_deref(), Some("A short summary."));

        let err = handler
            .handle(SummarizeChapter {
                chapter_id: ChapterId::new(9999),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
