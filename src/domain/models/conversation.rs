//! Conversation types.
//!
//! A conversation turn is request-scoped: query in, answer out. Nothing here
//! is persisted; cross-request memory lives in the page store only.

use serde::{Deserialize, Serialize};

/// How an answer is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    /// Answer constrained to retrieved page chunks.
    #[default]
    Grounded,
    /// Plain conversation, no retrieval context.
    Free,
}

/// An assembled prompt, ready for a completion provider.
///
/// Providers map this onto their own wire format (system field vs. system
/// message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}
