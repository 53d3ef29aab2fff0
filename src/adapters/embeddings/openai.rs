//! OpenAI-compatible embedding provider.
//!
//! Talks to the `/embeddings` endpoint; works against any server speaking
//! the same protocol (Azure OpenAI, local inference servers).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::ports::EmbeddingProvider;

/// Configuration for the OpenAI-compatible embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// API key. Falls back to `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,
    /// Base URL for the API. Default: `https://api.openai.com/v1`.
    pub base_url: String,
    /// Embedding model. Default: `text-embedding-3-small`.
    pub model: String,
    /// Expected embedding dimension. Default: 1536.
    pub dimension: usize,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
    /// Maximum texts per single API request. Default: 512.
    pub max_batch_size: usize,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            timeout_secs: 30,
            max_batch_size: 512,
        }
    }
}

impl OpenAiEmbeddingConfig {
    fn get_api_key(&self) -> CoreResult<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| CoreError::Provider {
                status: None,
                message: "embedding API key not set; set OPENAI_API_KEY or configure embedding.api_key"
                    .to_string(),
            })
    }
}

pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Provider {
                status: None,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, client })
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> CoreResult<Vec<Vec<f32>>> {
        let api_key = self.config.get_api_key()?;
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let request_body = EmbeddingsRequest {
            model: self.config.model.clone(),
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CoreError::Provider {
                status: None,
                message: format!("embedding request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(CoreError::Provider {
                status: Some(status.as_u16()),
                message: truncate(&body, 500),
            });
        }

        let result: EmbeddingsResponse = response.json().await.map_err(|e| CoreError::Provider {
            status: None,
            message: format!("failed to parse embedding response: {e}"),
        })?;

        // Responses may arrive out of order; restore input order by index.
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        for item in &data {
            if item.embedding.len() != self.config.dimension {
                return Err(CoreError::DimensionMismatch {
                    expected: self.config.dimension,
                    actual: item.embedding.len(),
                });
            }
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results.into_iter().next().ok_or_else(|| CoreError::Provider {
            status: None,
            message: "empty embedding response".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> CoreResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.max_batch_size) {
            let vectors = self.call_embeddings_api(batch.to_vec()).await?;
            all_vectors.extend(vectors);
        }

        Ok(all_vectors)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

// -- wire types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
