//! Ingestion pipeline.
//!
//! Orchestrates chunking, embedding, index writes, and the page-store write
//! as one logical unit per page. The page row is the commit marker: it is
//! written last, so a page visible in the store always has its full chunk
//! set in the index. Failures after partial index writes roll those writes
//! back and surface as `PartialIngestion`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{ChunkingConfig, EmbeddingRecord, Page, RetryConfig};
use crate::domain::ports::{EmbeddingProvider, PageRepository, VectorIndex};
use crate::services::chunker::Chunker;

/// Result of one ingestion request.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub page_id: Uuid,
    pub chunk_count: usize,
    /// True when an identical capture was already stored and no new page was
    /// created.
    pub deduplicated: bool,
}

pub struct IngestionPipeline {
    pages: Arc<dyn PageRepository>,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: Chunker,
    retry: RetryConfig,
    /// Per source-key locks serializing duplicate "memorize" requests.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl IngestionPipeline {
    pub fn new(
        pages: Arc<dyn PageRepository>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunking: ChunkingConfig,
        retry: RetryConfig,
    ) -> CoreResult<Self> {
        Ok(Self {
            pages,
            index,
            embedder,
            chunker: Chunker::new(chunking)?,
            retry,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Ingest one captured page.
    ///
    /// Concurrent calls with the same page identity are serialized and
    /// resolve to a single page record.
    pub async fn ingest(
        &self,
        title: &str,
        content: &str,
        captured_at: DateTime<Utc>,
    ) -> CoreResult<IngestReceipt> {
        if content.trim().is_empty() {
            return Err(CoreError::EmptyContent);
        }

        let source_key = Page::source_key(title, captured_at);
        let lock = self.lock_for(&source_key);
        let _guard = lock.lock().await;

        if let Some(existing) = self.pages.get_by_source_key(&source_key).await? {
            info!(page_id = %existing.id, "capture already ingested, deduplicating");
            return Ok(IngestReceipt {
                page_id: existing.id,
                chunk_count: existing.chunk_count,
                deduplicated: true,
            });
        }

        let page = Page::new(title, content, captured_at);
        let texts = self.chunker.split(&page.content);

        self.index
            .bind_model(self.embedder.model_id(), self.embedder.dimension())
            .await?;

        let vectors = self.embed_with_retry(&texts).await?;

        let records: Vec<EmbeddingRecord> = texts
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(seq, (text, vector))| EmbeddingRecord {
                chunk_id: EmbeddingRecord::chunk_id_for(page.id, seq),
                page_id: page.id,
                seq,
                content: text.clone(),
                vector,
            })
            .collect();

        let writes = try_join_all(records.iter().map(|record| self.index.add(record)));
        if let Err(err) = writes.await {
            return Err(self.roll_back(page.id, err).await);
        }

        let page = page.with_chunk_count(texts.len());
        if let Err(err) = self.pages.put(&page).await {
            return Err(self.roll_back(page.id, err).await);
        }

        info!(page_id = %page.id, chunks = page.chunk_count, title = %page.title, "page ingested");

        Ok(IngestReceipt {
            page_id: page.id,
            chunk_count: page.chunk_count,
            deduplicated: false,
        })
    }

    /// Remove a page and its indexed chunks.
    pub async fn forget(&self, page_id: Uuid) -> CoreResult<()> {
        if !self.pages.delete(page_id).await? {
            return Err(CoreError::PageNotFound(page_id));
        }
        let removed = self.index.remove_page(page_id).await?;
        info!(page_id = %page_id, chunks = removed, "page forgotten");
        Ok(())
    }

    /// Embed all chunk texts, retrying transient provider failures with
    /// exponential backoff a bounded number of times.
    async fn embed_with_retry(&self, texts: &[String]) -> CoreResult<Vec<Vec<f32>>> {
        let mut policy = ExponentialBackoff {
            initial_interval: Duration::from_millis(self.retry.initial_backoff_ms),
            max_interval: Duration::from_millis(self.retry.max_backoff_ms),
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        };

        let mut attempt = 0;
        loop {
            match self.embedder.embed_batch(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(err) if err.is_transient() && attempt < self.retry.max_retries => {
                    let delay = policy
                        .next_backoff()
                        .unwrap_or(Duration::from_millis(self.retry.max_backoff_ms));
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient embedding failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Remove any chunks written for a failed page and wrap the cause.
    async fn roll_back(&self, page_id: Uuid, cause: CoreError) -> CoreError {
        if let Err(cleanup) = self.index.remove_page(page_id).await {
            warn!(page_id = %page_id, error = %cleanup, "rollback of partial chunk set failed");
        }
        CoreError::PartialIngestion {
            page_id,
            source: Box::new(cause),
        }
    }

    fn lock_for(&self, source_key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks
            .entry(source_key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::adapters::embeddings::HashedBagEmbedder;
    use crate::adapters::sqlite::{
        create_test_pool, Migrator, SqlitePageRepository, SqliteVectorIndex,
    };

    async fn test_pipeline() -> IngestionPipeline {
        let pool = create_test_pool().await.unwrap();
        Migrator::new(pool.clone()).run_embedded().await.unwrap();

        IngestionPipeline::new(
            Arc::new(SqlitePageRepository::new(pool.clone())),
            Arc::new(SqliteVectorIndex::new(pool)),
            Arc::new(HashedBagEmbedder::new(64)),
            ChunkingConfig::default(),
            RetryConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let pipeline = test_pipeline().await;
        let result = pipeline.ingest("Empty", "   \n  ", Utc::now()).await;
        assert!(matches!(result, Err(CoreError::EmptyContent)));
    }

    #[tokio::test]
    async fn duplicate_capture_resolves_to_one_page() {
        let pipeline = test_pipeline().await;
        let captured = Utc::now();

        let first = pipeline.ingest("AI", "Some captured text.", captured).await.unwrap();
        let second = pipeline.ingest("AI", "Some captured text.", captured).await.unwrap();

        assert!(!first.deduplicated);
        assert!(second.deduplicated);
        assert_eq!(first.page_id, second.page_id);
    }

    #[tokio::test]
    async fn forget_unknown_page_is_not_found() {
        let pipeline = test_pipeline().await;
        let result = pipeline.forget(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CoreError::PageNotFound(_))));
    }

    /// Embedder that fails transiently a fixed number of times before
    /// succeeding.
    struct FlakyEmbedder {
        inner: HashedBagEmbedder,
        failures_left: AtomicU32,
    }

    #[async_trait]
    impl EmbeddingProvider for FlakyEmbedder {
        fn model_id(&self) -> &str {
            self.inner.model_id()
        }

        fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
            self.inner.embed(text).await
        }

        async fn embed_batch(&self, texts: &[String]) -> CoreResult<Vec<Vec<f32>>> {
            if self.failures_left.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok() {
                return Err(CoreError::Provider {
                    status: Some(503),
                    message: "overloaded".to_string(),
                });
            }
            self.inner.embed_batch(texts).await
        }
    }

    #[tokio::test]
    async fn transient_embedding_failures_are_retried() {
        let pool = create_test_pool().await.unwrap();
        Migrator::new(pool.clone()).run_embedded().await.unwrap();

        let pipeline = IngestionPipeline::new(
            Arc::new(SqlitePageRepository::new(pool.clone())),
            Arc::new(SqliteVectorIndex::new(pool)),
            Arc::new(FlakyEmbedder {
                inner: HashedBagEmbedder::new(64),
                failures_left: AtomicU32::new(2),
            }),
            ChunkingConfig::default(),
            RetryConfig {
                max_retries: 3,
                initial_backoff_ms: 1,
                max_backoff_ms: 5,
            },
        )
        .unwrap();

        let receipt = pipeline.ingest("Flaky", "Content survives retries.", Utc::now()).await.unwrap();
        assert_eq!(receipt.chunk_count, 1);
    }

    #[tokio::test]
    async fn permanent_embedding_failure_is_not_retried() {
        let pool = create_test_pool().await.unwrap();
        Migrator::new(pool.clone()).run_embedded().await.unwrap();

        struct AuthFailEmbedder;

        #[async_trait]
        impl EmbeddingProvider for AuthFailEmbedder {
            fn model_id(&self) -> &str {
                "broken"
            }

            fn dimension(&self) -> usize {
                64
            }

            async fn embed(&self, _text: &str) -> CoreResult<Vec<f32>> {
                Err(CoreError::Provider { status: Some(401), message: "bad key".to_string() })
            }

            async fn embed_batch(&self, _texts: &[String]) -> CoreResult<Vec<Vec<f32>>> {
                Err(CoreError::Provider { status: Some(401), message: "bad key".to_string() })
            }
        }

        let pages: Arc<dyn PageRepository> = Arc::new(SqlitePageRepository::new(pool.clone()));
        let pipeline = IngestionPipeline::new(
            pages.clone(),
            Arc::new(SqliteVectorIndex::new(pool)),
            Arc::new(AuthFailEmbedder),
            ChunkingConfig::default(),
            RetryConfig::default(),
        )
        .unwrap();

        let result = pipeline.ingest("Denied", "Content.", Utc::now()).await;
        assert!(matches!(result, Err(CoreError::Provider { status: Some(401), .. })));

        // No half-visible page.
        assert_eq!(pages.count().await.unwrap(), 0);
    }
}
