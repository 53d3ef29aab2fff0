//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use retrace::adapters::embeddings::HashedBagEmbedder;
use retrace::adapters::sqlite::{
    create_test_pool, Migrator, SqlitePageRepository, SqliteProfileRepository, SqliteVectorIndex,
};
use retrace::domain::models::{CompletionProfile, Prompt};
use retrace::{CompletionProvider, Config, CoreResult, Engine};

/// Completion provider that echoes the user prompt back, so grounded answers
/// contain the injected excerpts verbatim. Counts calls for assertions.
pub struct EchoCompletion {
    calls: AtomicUsize,
}

impl EchoCompletion {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for EchoCompletion {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn complete(&self, prompt: &Prompt, _profile: &CompletionProfile) -> CoreResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompt.user.clone())
    }
}

pub async fn migrated_pool() -> SqlitePool {
    let pool = create_test_pool().await.expect("test pool");
    Migrator::new(pool.clone())
        .run_embedded()
        .await
        .expect("migrations");
    pool
}

/// Engine over an in-memory database, a deterministic local embedder, and
/// the echoing completion provider.
pub async fn test_engine() -> (Arc<Engine>, Arc<EchoCompletion>) {
    let pool = migrated_pool().await;
    engine_over(pool, 256).await
}

pub async fn engine_over(pool: SqlitePool, embed_dim: usize) -> (Arc<Engine>, Arc<EchoCompletion>) {
    let completions = EchoCompletion::new();
    let engine = Engine::new(
        Config::default(),
        Arc::new(SqlitePageRepository::new(pool.clone())),
        Arc::new(SqliteVectorIndex::new(pool.clone())),
        Arc::new(SqliteProfileRepository::new(pool)),
        Arc::new(HashedBagEmbedder::new(embed_dim)),
        completions.clone(),
    )
    .expect("engine");

    (Arc::new(engine), completions)
}
