//! Application configuration model.
//!
//! Loaded by `config::ConfigLoader` with hierarchical merging; every field
//! has a programmatic default so a bare install runs offline.

use serde::{Deserialize, Serialize};

use super::chunking::ChunkingConfig;
use super::profile::CompletionProfile;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    /// Default completion profile, used when the settings store has no
    /// active profile.
    pub completion: CompletionProfile,
    pub logging: LoggingConfig,
    pub retry: RetryConfig,
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// SQLite storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file path, or `:memory:` for an ephemeral index.
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ".retrace/retrace.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Retrieval ranking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the composer.
    pub top_k: usize,
    /// Minimum cosine similarity for a chunk to count as relevant.
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.25,
        }
    }
}

/// Which embedding implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Deterministic local hashed bag-of-words embedder. No network, no
    /// model download; the offline default.
    #[default]
    Hashed,
    /// OpenAI-compatible `/embeddings` endpoint.
    Openai,
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Model name for the remote backend.
    pub model: String,
    /// Vector dimensionality. For the hashed backend this is the bucket
    /// count; for remote backends it must match the model's output.
    pub dimension: usize,
    /// Base URL for the remote backend. Empty means the provider default.
    pub base_url: String,
    /// API key for the remote backend. `None` falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hashed,
            model: "text-embedding-3-small".to_string(),
            dimension: 256,
            base_url: String::new(),
            api_key: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
    pub level: String,
    /// json or pretty
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Bounded retry with exponential backoff for transient provider errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_offline_friendly() {
        let config = Config::default();
        assert_eq!(config.embedding.backend, EmbeddingBackend::Hashed);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, ".retrace/retrace.db");
        assert_eq!(config.retrieval.top_k, 5);
        assert!(config.chunking.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_yaml_style_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.embedding.dimension, config.embedding.dimension);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: Config = serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(parsed.server.port, 9000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.retry.max_retries, 3);
    }
}
