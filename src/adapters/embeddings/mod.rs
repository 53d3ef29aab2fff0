//! Embedding provider adapters.

pub mod hashed;
pub mod openai;

pub use hashed::HashedBagEmbedder;
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
