//! Application engine: wires the storage, providers, and services together
//! and exposes the operations the HTTP and CLI boundaries call into.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::adapters::completion::CompletionRouter;
use crate::adapters::embeddings::{HashedBagEmbedder, OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
use crate::adapters::sqlite::{
    create_pool, Migrator, PoolConfig, SqlitePageRepository, SqliteProfileRepository,
    SqliteVectorIndex,
};
use crate::domain::errors::CoreResult;
use crate::domain::models::{
    ChatMode, CompletionProfile, Config, EmbeddingBackend, Page, PageSummary,
};
use crate::domain::ports::{
    CompletionProvider, EmbeddingProvider, PageRepository, ProfileRepository, VectorIndex,
};
use crate::services::{AnswerComposer, IngestReceipt, IngestionPipeline, Retriever};

/// Settings key holding the name of the active provider profile.
pub const ACTIVE_PROFILE_KEY: &str = "active_profile";

const PROVIDER_TIMEOUT_SECS: u64 = 120;

pub struct Engine {
    config: Config,
    pages: Arc<dyn PageRepository>,
    index: Arc<dyn VectorIndex>,
    profiles: Arc<dyn ProfileRepository>,
    pipeline: IngestionPipeline,
    retriever: Retriever,
    composer: AnswerComposer,
}

impl Engine {
    /// Assemble an engine from explicit parts. Tests use this to swap in
    /// mock providers.
    pub fn new(
        config: Config,
        pages: Arc<dyn PageRepository>,
        index: Arc<dyn VectorIndex>,
        profiles: Arc<dyn ProfileRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        completions: Arc<dyn CompletionProvider>,
    ) -> CoreResult<Self> {
        let pipeline = IngestionPipeline::new(
            pages.clone(),
            index.clone(),
            embedder.clone(),
            config.chunking.clone(),
            config.retry.clone(),
        )?;

        Ok(Self {
            retriever: Retriever::new(index.clone(), embedder),
            composer: AnswerComposer::new(completions),
            config,
            pages,
            index,
            profiles,
            pipeline,
        })
    }

    /// Build the production engine from configuration: open the database,
    /// run migrations, and construct the configured adapters.
    pub async fn bootstrap(config: Config) -> Result<Self> {
        let pool = create_pool(
            &config.database.path,
            Some(PoolConfig {
                max_connections: config.database.max_connections,
                ..PoolConfig::default()
            }),
        )
        .await
        .context("Failed to open database")?;

        let applied = Migrator::new(pool.clone())
            .run_embedded()
            .await
            .context("Failed to run database migrations")?;
        if applied > 0 {
            info!(applied, "applied database migrations");
        }

        let embedder: Arc<dyn EmbeddingProvider> = match config.embedding.backend {
            EmbeddingBackend::Hashed => Arc::new(HashedBagEmbedder::new(config.embedding.dimension)),
            EmbeddingBackend::Openai => Arc::new(OpenAiEmbeddingProvider::new(
                OpenAiEmbeddingConfig {
                    api_key: config.embedding.api_key.clone(),
                    base_url: if config.embedding.base_url.is_empty() {
                        OpenAiEmbeddingConfig::default().base_url
                    } else {
                        config.embedding.base_url.clone()
                    },
                    model: config.embedding.model.clone(),
                    dimension: config.embedding.dimension,
                    ..OpenAiEmbeddingConfig::default()
                },
            )?),
        };

        info!(model = embedder.model_id(), dimension = embedder.dimension(), "embedding provider ready");

        let completions: Arc<dyn CompletionProvider> =
            Arc::new(CompletionRouter::new(PROVIDER_TIMEOUT_SECS)?);

        Self::new(
            config,
            Arc::new(SqlitePageRepository::new(pool.clone())),
            Arc::new(SqliteVectorIndex::new(pool.clone())),
            Arc::new(SqliteProfileRepository::new(pool)),
            embedder,
            completions,
        )
        .map_err(Into::into)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileRepository> {
        &self.profiles
    }

    /// Ingest one captured page.
    pub async fn memorize(
        &self,
        title: &str,
        content: &str,
        captured_at: DateTime<Utc>,
    ) -> CoreResult<IngestReceipt> {
        self.pipeline.ingest(title, content, captured_at).await
    }

    /// Answer one conversation turn.
    pub async fn chat(&self, message: &str, mode: ChatMode) -> CoreResult<String> {
        let retrieved = match mode {
            ChatMode::Grounded => {
                self.retriever
                    .retrieve(
                        message,
                        self.config.retrieval.top_k,
                        self.config.retrieval.min_score,
                    )
                    .await?
            }
            ChatMode::Free => Vec::new(),
        };

        let profile = self.active_profile().await?;
        self.composer.compose(message, mode, &retrieved, &profile).await
    }

    /// List stored pages, optionally filtered.
    pub async fn pages(&self, filter: Option<&str>) -> CoreResult<Vec<PageSummary>> {
        self.pages.list(filter).await
    }

    /// Fetch one page, erroring on unknown ids.
    pub async fn page(&self, id: Uuid) -> CoreResult<Page> {
        self.pages
            .get(id)
            .await?
            .ok_or(crate::domain::errors::CoreError::PageNotFound(id))
    }

    /// Delete a page and its indexed chunks.
    pub async fn forget(&self, id: Uuid) -> CoreResult<()> {
        self.pipeline.forget(id).await
    }

    /// Number of stored pages, for the health endpoint.
    pub async fn stored_pages(&self) -> CoreResult<u64> {
        self.pages.count().await
    }

    /// Chunks indexed for a page, for consistency checks.
    pub async fn indexed_chunks(&self, page_id: Uuid) -> CoreResult<u64> {
        self.index.count_for_page(page_id).await
    }

    /// Resolve the completion profile for this call: the stored active
    /// profile if one is selected, else the configured default.
    async fn active_profile(&self) -> CoreResult<CompletionProfile> {
        let active_name = self
            .profiles
            .get_setting(ACTIVE_PROFILE_KEY)
            .await?
            .and_then(|v| v.as_str().map(str::to_string));

        if let Some(name) = active_name {
            if let Some(record) = self.profiles.get_api_config(&name).await? {
                return Ok(record.to_profile(&self.config.completion));
            }
        }

        Ok(self.config.completion.clone())
    }
}
