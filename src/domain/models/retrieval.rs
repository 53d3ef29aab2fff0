//! Retrieval and embedding-index models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One chunk embedding as held by the vector index.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    /// Stable chunk identity: `{page_id}:chunk:{seq}`. Re-inserting the same
    /// id replaces the row, which makes ingestion retries idempotent.
    pub chunk_id: String,

    /// Parent page. Back-reference only; the page store owns the page.
    pub page_id: Uuid,

    /// Position of the chunk within the page, contiguous from 0.
    pub seq: usize,

    /// The chunk text.
    pub content: String,

    /// Embedding vector. Dimensionality is fixed per index.
    pub vector: Vec<f32>,
}

impl EmbeddingRecord {
    pub fn chunk_id_for(page_id: Uuid, seq: usize) -> String {
        format!("{page_id}:chunk:{seq}")
    }
}

/// A ranked hit from the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk_id: String,
    pub page_id: Uuid,
    pub content: String,
    /// Cosine similarity to the query, higher is better.
    pub score: f32,
}

/// A retrieved chunk as handed to the answer composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub page_id: Uuid,
    pub content: String,
    pub score: f32,
}

impl From<SearchHit> for RetrievedChunk {
    fn from(hit: SearchHit) -> Self {
        Self {
            chunk_id: hit.chunk_id,
            page_id: hit.page_id,
            content: hit.content,
            score: hit.score,
        }
    }
}

/// Which embedding model produced an index, and at what dimensionality.
///
/// Mixing vectors from different models corrupts similarity scores silently,
/// so the index records its model and rejects mismatched writers and readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub model_id: String,
    pub dimension: usize,
}
