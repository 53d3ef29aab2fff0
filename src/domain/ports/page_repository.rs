//! Page store port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::CoreResult;
use crate::domain::models::{Page, PageSummary};

/// Durable record of ingested pages.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Insert a page record. The ingestion pipeline calls this last, after
    /// the page's chunk set is fully indexed.
    async fn put(&self, page: &Page) -> CoreResult<()>;

    /// Fetch a page by id.
    async fn get(&self, id: Uuid) -> CoreResult<Option<Page>>;

    /// Fetch a page by its dedup identity.
    async fn get_by_source_key(&self, source_key: &str) -> CoreResult<Option<Page>>;

    /// List page summaries, newest capture first. `filter` is a
    /// case-insensitive substring match over title and preview.
    async fn list(&self, filter: Option<&str>) -> CoreResult<Vec<PageSummary>>;

    /// Delete a page record. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> CoreResult<bool>;

    /// Number of stored pages.
    async fn count(&self) -> CoreResult<u64>;
}
