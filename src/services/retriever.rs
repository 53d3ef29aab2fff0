//! Query-side retrieval.
//!
//! Embeds the query and delegates ranking to the vector index, after
//! verifying that the index was built with the same embedding model.

use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::RetrievedChunk;
use crate::domain::ports::{EmbeddingProvider, VectorIndex};

pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    pub fn new(index: Arc<dyn VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// Top-`k` chunks relevant to `query`, scored by cosine similarity and
    /// filtered by `min_score`. No hits is an empty sequence, not an error.
    ///
    /// Fails with `EmbeddingModelMismatch` when the index was produced by a
    /// different embedding model than the active provider; mixing embedding
    /// spaces would corrupt similarity scores silently.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        min_score: f32,
    ) -> CoreResult<Vec<RetrievedChunk>> {
        match self.index.metadata().await? {
            // Nothing indexed yet: nothing can match.
            None => return Ok(Vec::new()),
            Some(meta) => {
                if meta.model_id != self.embedder.model_id() {
                    return Err(CoreError::EmbeddingModelMismatch {
                        index_model: meta.model_id,
                        query_model: self.embedder.model_id().to_string(),
                    });
                }
            }
        }

        let vector = self.embedder.embed(query).await?;
        let hits = self.index.search(&vector, k, min_score).await?;

        debug!(
            query_chars = query.chars().count(),
            hits = hits.len(),
            "retrieval complete"
        );

        Ok(hits.into_iter().map(RetrievedChunk::from).collect())
    }
}
