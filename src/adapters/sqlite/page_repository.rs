//! SQLite implementation of the page store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{Page, PageSummary};
use crate::domain::ports::PageRepository;

#[derive(Clone)]
pub struct SqlitePageRepository {
    pool: SqlitePool,
}

impl SqlitePageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageRepository for SqlitePageRepository {
    async fn put(&self, page: &Page) -> CoreResult<()> {
        sqlx::query(
            r#"INSERT INTO pages (id, source_key, title, content, preview, captured_at, chunk_count, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(page.id.to_string())
        .bind(&page.source_key)
        .bind(&page.title)
        .bind(&page.content)
        .bind(&page.preview)
        .bind(page.captured_at.to_rfc3339())
        .bind(page.chunk_count as i64)
        .bind(page.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Page>> {
        let row = sqlx::query("SELECT * FROM pages WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| page_from_row(&r)).transpose()
    }

    async fn get_by_source_key(&self, source_key: &str) -> CoreResult<Option<Page>> {
        let row = sqlx::query("SELECT * FROM pages WHERE source_key = ?")
            .bind(source_key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| page_from_row(&r)).transpose()
    }

    async fn list(&self, filter: Option<&str>) -> CoreResult<Vec<PageSummary>> {
        let rows = match filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(needle) => {
                let pattern = format!("%{}%", escape_like(needle));
                sqlx::query(
                    r#"SELECT id, title, preview, captured_at, chunk_count FROM pages
                       WHERE LOWER(title) LIKE LOWER(?) ESCAPE '\'
                          OR LOWER(preview) LIKE LOWER(?) ESCAPE '\'
                       ORDER BY captured_at DESC"#,
                )
                .bind(&pattern)
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, title, preview, captured_at, chunk_count FROM pages ORDER BY captured_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(summary_from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> CoreResult<u64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pages")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as u64)
    }
}

fn page_from_row(row: &sqlx::sqlite::SqliteRow) -> CoreResult<Page> {
    Ok(Page {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        source_key: row.get("source_key"),
        title: row.get("title"),
        content: row.get("content"),
        preview: row.get("preview"),
        captured_at: parse_timestamp(&row.get::<String, _>("captured_at"))?,
        chunk_count: row.get::<i64, _>("chunk_count") as usize,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
    })
}

fn summary_from_row(row: &sqlx::sqlite::SqliteRow) -> CoreResult<PageSummary> {
    Ok(PageSummary {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        title: row.get("title"),
        preview: row.get("preview"),
        captured_at: parse_timestamp(&row.get::<String, _>("captured_at"))?,
        chunk_count: row.get::<i64, _>("chunk_count") as usize,
    })
}

fn parse_uuid(raw: &str) -> CoreResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| CoreError::Database(format!("invalid uuid '{raw}': {e}")))
}

fn parse_timestamp(raw: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::Database(format!("invalid timestamp '{raw}': {e}")))
}

/// Escape `%`, `_`, and the escape char itself for a LIKE pattern.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
