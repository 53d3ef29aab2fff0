//! Completion provider port.

use async_trait::async_trait;

use crate::domain::errors::CoreResult;
use crate::domain::models::{CompletionProfile, Prompt};

/// Trait for completion providers.
///
/// The profile travels with every call; implementations read base URL, key,
/// and model from it rather than from ambient state.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short implementation name for logs.
    fn name(&self) -> &'static str;

    /// Generate a completion for the assembled prompt.
    async fn complete(&self, prompt: &Prompt, profile: &CompletionProfile) -> CoreResult<String>;
}
