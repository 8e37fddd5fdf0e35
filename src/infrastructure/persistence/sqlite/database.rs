//! SQLite Database - 数据库连接和迁移

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite 连接 URL
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
///
/// 每个连接都设置 WAL、busy_timeout=5000ms、synchronous=NORMAL 和外键约束
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000))
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(
        url = %config.database_url,
        max_connections = config.max_connections,
        "SQLite pool created"
    );

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // 创建 books 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT,
            file_path TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建 chapters 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chapters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT,
            chapter_order INTEGER NOT NULL,
            summary TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建索引
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chapters_book_id ON chapters(book_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chapters_order ON chapters(chapter_order)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_file_database_url() {
        let config = DatabaseConfig::new("data/test.db");
        assert_eq!(config.database_url, "sqlite:data/test.db?mode=rwc");
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('books', 'chapters') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec![("books".to_string(),), ("chapters".to_string(),)]);
    }
}
