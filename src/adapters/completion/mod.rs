//! Completion provider adapters.
//!
//! One adapter per recognized wire format, plus a router that dispatches on
//! the profile's kind so callers hold a single `CompletionProvider`.

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicCompletionProvider;
pub use openai::OpenAiCompletionProvider;

use async_trait::async_trait;

use crate::domain::errors::CoreResult;
use crate::domain::models::{CompletionProfile, Prompt, ProviderKind};
use crate::domain::ports::CompletionProvider;

/// Dispatches to the adapter matching the profile's wire format.
pub struct CompletionRouter {
    openai: OpenAiCompletionProvider,
    anthropic: AnthropicCompletionProvider,
}

impl CompletionRouter {
    pub fn new(timeout_secs: u64) -> CoreResult<Self> {
        Ok(Self {
            openai: OpenAiCompletionProvider::new(timeout_secs)?,
            anthropic: AnthropicCompletionProvider::new(timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for CompletionRouter {
    fn name(&self) -> &'static str {
        "router"
    }

    async fn complete(&self, prompt: &Prompt, profile: &CompletionProfile) -> CoreResult<String> {
        match profile.kind {
            ProviderKind::OpenaiCompatible => self.openai.complete(prompt, profile).await,
            ProviderKind::AnthropicCompatible => self.anthropic.complete(prompt, profile).await,
        }
    }
}

/// Shared HTTP client construction for the completion adapters.
pub(crate) fn build_client(timeout_secs: u64) -> CoreResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| crate::domain::errors::CoreError::Provider {
            status: None,
            message: format!("failed to build HTTP client: {e}"),
        })
}

/// Truncate provider error bodies before they reach logs or clients.
pub(crate) fn truncate_body(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
