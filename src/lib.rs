//! Retrace - local content-indexing and retrieval engine.
//!
//! Retrace ingests captured web-page text, chunks and embeds it, stores the
//! vectors in a local index, and answers free-form queries by retrieving
//! relevant chunks and conditioning a language model on them. Thin UI layers
//! (browser extension, desktop shell, settings forms) talk to it over an
//! HTTP JSON boundary.
//!
//! # Architecture
//!
//! - **Domain** (`domain`): models, error taxonomy, and the ports the core
//!   depends on
//! - **Services** (`services`): chunker, retriever, answer composer, and the
//!   ingestion pipeline
//! - **Adapters** (`adapters`): SQLite storage and the embedding/completion
//!   provider implementations
//! - **API** (`api`): the HTTP boundary
//! - **CLI** (`cli`): command-line interface

pub mod adapters;
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod services;

// Re-export commonly used types for convenience
pub use app::Engine;
pub use config::{ConfigError, ConfigLoader};
pub use domain::errors::{CoreError, CoreResult};
pub use domain::models::{
    ChatMode, ChunkingConfig, CompletionProfile, Config, Page, PageSummary, ProviderKind,
    RetrievedChunk,
};
pub use domain::ports::{
    CompletionProvider, EmbeddingProvider, PageRepository, ProfileRepository, VectorIndex,
};
pub use services::{AnswerComposer, Chunker, IngestionPipeline, Retriever};
