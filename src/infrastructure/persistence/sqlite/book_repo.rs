//! SQLite Book Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::path::PathBuf;

use super::DbPool;
use crate::application::ports::{
    BookRecord, BookRepositoryPort, ChapterRecord, NewBook, RepositoryError,
};
use crate::domain::book::{BookId, Chapter, ChapterId};

/// SQLite Book Repository
pub struct SqliteBookRepository {
    pool: DbPool,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[derive(FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: Option<String>,
    file_path: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BookRow> for BookRecord {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(BookRecord {
            id: BookId::new(row.id),
            title: row.title,
            author: row.author,
            file_path: PathBuf::from(row.file_path),
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: i64,
    book_id: i64,
    title: String,
    content: Option<String>,
    chapter_order: i64,
    summary: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: ChapterId::new(row.id),
            book_id: BookId::new(row.book_id),
            title: row.title,
            content: row.content,
            order: usize::try_from(row.chapter_order)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            summary: row.summary,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

const BOOK_COLUMNS: &str = "id, title, author, file_path, created_at, updated_at";
const CHAPTER_COLUMNS: &str =
    "id, book_id, title, content, chapter_order, summary, created_at, updated_at";

#[async_trait]
impl BookRepositoryPort for SqliteBookRepository {
    async fn create_with_chapters(
        &self,
        book: &NewBook,
        chapters: &[Chapter],
    ) -> Result<BookRecord, RepositoryError> {
        let now = Utc::now();
        let timestamp = now.to_rfc3339();

        // 书籍和章节在同一事务中写入，失败时整体回滚
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let book_id = sqlx::query(
            "INSERT INTO books (title, author, file_path, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.file_path.to_string_lossy().to_string())
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        for chapter in chapters {
            sqlx::query(
                r#"
                INSERT INTO chapters (book_id, title, content, chapter_order, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(book_id)
            .bind(chapter.title().as_str())
            .bind(chapter.content())
            .bind(chapter.order() as i64)
            .bind(&timestamp)
            .bind(&timestamp)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(book_id, chapters = chapters.len(), "Book rows inserted");

        Ok(BookRecord {
            id: BookId::new(book_id),
            title: book.title.clone(),
            author: book.author.clone(),
            file_path: book.file_path.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<BookRecord>, RepositoryError> {
        let row: Option<BookRow> =
            sqlx::query_as(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(BookRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<BookRecord>, RepositoryError> {
        let rows: Vec<BookRow> =
            sqlx::query_as(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id DESC"))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        rows.into_iter().map(BookRecord::try_from).collect()
    }

    async fn delete(&self, id: BookId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM chapters WHERE book_id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("book {}", id)));
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn find_chapters(&self, book_id: BookId) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE book_id = ? ORDER BY chapter_order"
        ))
        .bind(book_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn find_chapter(&self, id: ChapterId) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> =
            sqlx::query_as(&format!("SELECT {CHAPTER_COLUMNS} FROM chapters WHERE id = ?"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn update_summary(&self, id: ChapterId, summary: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chapters SET summary = ?, updated_at = ? WHERE id = ?")
            .bind(summary)
            .bind(Utc::now().to_rfc3339())
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chapter {}", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::ChapterTitle;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteBookRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteBookRepository::new(pool)
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: None,
            file_path: PathBuf::from(format!("/uploads/{title}.epub")),
        }
    }

    fn chapter(order: usize, title: &str, content: Option<&str>) -> Chapter {
        Chapter::new(order, ChapterTitle::new(title).unwrap(), content.map(str::to_string)).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = repo().await;

        let first = repo.create_with_chapters(&new_book("a"), &[]).await.unwrap();
        let second = repo.create_with_chapters(&new_book("b"), &[]).await.unwrap();

        assert!(second.id.as_i64() > first.id.as_i64());

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "b");
    }

    #[tokio::test]
    async fn test_chapters_round_trip_in_order() {
        let repo = repo().await;
        let book = repo
            .create_with_chapters(
                &new_book("book"),
                &[
                    chapter(1, "Intro", Some("Hello world")),
                    chapter(2, "doc2", Some("No heading here")),
                    chapter(3, "Outline only", None),
                ],
            )
            .await
            .unwrap();

        let chapters = repo.find_chapters(book.id).await.unwrap();
        assert_eq!(chapters.len(), 3);
        assert_eq!(
            chapters.iter().map(|c| c.order).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(chapters[1].title, "doc2");
        assert_eq!(chapters[2].content, None);
        assert!(chapters.iter().all(|c| c.book_id == book.id && c.summary.is_none()));
    }

    #[tokio::test]
    async fn test_update_summary() {
        let repo = repo().await;
        let book = repo
            .create_with_chapters(&new_book("book"), &[chapter(1, "One", Some("text"))])
            .await
            .unwrap();
        let id = repo.find_chapters(book.id).await.unwrap()[0].id;

        repo.update_summary(id, "Short.").await.unwrap();
        let stored = repo.find_chapter(id).await.unwrap().unwrap();
        assert_eq!(stored.summary.as_deref(), Some("Short."));

        let missing = repo.update_summary(ChapterId::new(999), "x").await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_chapters() {
        let repo = repo().await;
        let book = repo
            .create_with_chapters(&new_book("book"), &[chapter(1, "One", Some("text"))])
            .await
            .unwrap();

        repo.delete(book.id).await.unwrap();

        assert!(repo.find_by_id(book.id).await.unwrap().is_none());
        assert!(repo.find_chapters(book.id).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete(book.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
