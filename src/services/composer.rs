//! Answer composition.
//!
//! Builds the prompt for a conversation turn and invokes the completion
//! provider. Grounded mode injects retrieved chunks as labeled context with
//! an instruction to answer only from them; free mode sends a plain
//! conversational prompt.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::CoreResult;
use crate::domain::models::{ChatMode, CompletionProfile, Prompt, RetrievedChunk};
use crate::domain::ports::CompletionProvider;

/// Answer returned in grounded mode when retrieval produced nothing. Not an
/// error: the user asked about history that simply isn't there.
pub const NO_CONTEXT_ANSWER: &str =
    "I couldn't find anything relevant in your saved pages. Memorize the page first, or switch to free mode to chat without your browsing history.";

const GROUNDED_SYSTEM: &str = "You answer questions about the user's saved browsing history. \
Use only the numbered excerpts provided. If the excerpts do not contain the answer, \
say so explicitly instead of guessing.";

const FREE_SYSTEM: &str = "You are a helpful assistant.";

pub struct AnswerComposer {
    completions: Arc<dyn CompletionProvider>,
}

impl AnswerComposer {
    pub fn new(completions: Arc<dyn CompletionProvider>) -> Self {
        Self { completions }
    }

    /// Produce an answer for one conversation turn.
    pub async fn compose(
        &self,
        query: &str,
        mode: ChatMode,
        retrieved: &[RetrievedChunk],
        profile: &CompletionProfile,
    ) -> CoreResult<String> {
        let prompt = match mode {
            ChatMode::Grounded if retrieved.is_empty() => {
                debug!("grounded query with no retrieved context");
                return Ok(NO_CONTEXT_ANSWER.to_string());
            }
            ChatMode::Grounded => grounded_prompt(query, retrieved),
            ChatMode::Free => free_prompt(query),
        };

        self.completions.complete(&prompt, profile).await
    }
}

fn grounded_prompt(query: &str, retrieved: &[RetrievedChunk]) -> Prompt {
    let mut user = String::from("Excerpts from the user's saved pages:\n\n");

    for (i, chunk) in retrieved.iter().enumerate() {
        let _ = writeln!(
            user,
            "[{}] (page {}, relevance {:.2})\n{}\n",
            i + 1,
            chunk.page_id,
            chunk.score,
            chunk.content.trim()
        );
    }

    let _ = write!(user, "Question: {query}");

    Prompt {
        system: GROUNDED_SYSTEM.to_string(),
        user,
    }
}

fn free_prompt(query: &str) -> Prompt {
    Prompt {
        system: FREE_SYSTEM.to_string(),
        user: query.to_string(),
    }
}
