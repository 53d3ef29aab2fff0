//! Embedding provider port.
//!
//! Converts text into dense vectors for similarity search. Implementations
//! must be swappable without touching the core: the index records the
//! provider's `model_id` and refuses vectors from a different one.

use async_trait::async_trait;

use crate::domain::errors::CoreResult;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Stable identifier of the model producing the vectors, used for the
    /// index consistency check.
    fn model_id(&self) -> &str;

    /// Vector dimensionality for this provider/model.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>>;

    /// Embed multiple texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> CoreResult<Vec<Vec<f32>>>;
}
