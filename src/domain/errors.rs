//! Domain errors for the retrace content index.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the retrace core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Nothing to ingest: content is empty or whitespace-only")]
    EmptyContent,

    #[error("Embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding model mismatch: index was built with '{index_model}', query embedded with '{query_model}'")]
    EmbeddingModelMismatch {
        index_model: String,
        query_model: String,
    },

    #[error("Provider request failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Provider {
        /// HTTP status from the upstream provider, if the request got that far.
        status: Option<u16>,
        message: String,
    },

    #[error("Page not found: {0}")]
    PageNotFound(Uuid),

    #[error("Ingestion of page {page_id} failed partway and was rolled back: {source}")]
    PartialIngestion {
        page_id: Uuid,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether the failure is worth retrying with backoff.
    ///
    /// Network-level failures and rate-limit / server-side statuses are
    /// transient; malformed requests and auth failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::Provider { status, .. } => match status {
                None => true,
                Some(code) => matches!(code, 408 | 429 | 500 | 502 | 503 | 504 | 529),
            },
            _ => false,
        }
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
