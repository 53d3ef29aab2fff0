//! Embedding index port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::CoreResult;
use crate::domain::models::{EmbeddingRecord, IndexMetadata, SearchHit};

/// Vector storage with nearest-neighbor retrieval.
///
/// Ranking is by cosine similarity, descending; ties break by insertion
/// order (earlier wins) so results are deterministic.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Which embedding model this index was built with, or `None` while the
    /// index is still empty and unbound.
    async fn metadata(&self) -> CoreResult<Option<IndexMetadata>>;

    /// Bind the index to an embedding model before the first write. Binding
    /// again with the same model is a no-op; binding with a different model
    /// fails with `EmbeddingModelMismatch`.
    async fn bind_model(&self, model_id: &str, dimension: usize) -> CoreResult<IndexMetadata>;

    /// Insert one chunk embedding. Replaces an existing record with the same
    /// chunk id, so retries are idempotent. Fails with `DimensionMismatch`
    /// when the vector length differs from the bound dimension.
    async fn add(&self, record: &EmbeddingRecord) -> CoreResult<()>;

    /// Remove all chunks for a page. Returns how many were removed.
    async fn remove_page(&self, page_id: Uuid) -> CoreResult<u64>;

    /// Top-`k` chunks with similarity of at least `min_score`. An empty
    /// index yields an empty result, never an error.
    async fn search(&self, query: &[f32], k: usize, min_score: f32) -> CoreResult<Vec<SearchHit>>;

    /// Number of chunks indexed for one page.
    async fn count_for_page(&self, page_id: Uuid) -> CoreResult<u64>;
}
