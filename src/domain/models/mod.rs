//! Domain models.

pub mod chunking;
pub mod config;
pub mod conversation;
pub mod page;
pub mod profile;
pub mod retrieval;

pub use chunking::ChunkingConfig;
pub use config::{
    Config, DatabaseConfig, EmbeddingBackend, EmbeddingConfig, LoggingConfig, RetrievalConfig,
    RetryConfig, ServerConfig,
};
pub use conversation::{ChatMode, Prompt};
pub use page::{Page, PageSummary};
pub use profile::{ApiConfigRecord, CompletionProfile, ProviderKind};
pub use retrieval::{EmbeddingRecord, IndexMetadata, RetrievedChunk, SearchHit};
