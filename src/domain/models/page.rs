//! Page domain model.
//!
//! A page is the unit of ingestion: one captured web page with its raw text.
//! Pages are immutable after ingestion except for deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of content characters kept as the list/search preview snippet.
pub const PREVIEW_CHARS: usize = 200;

/// A captured page held by the page store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier, generated at ingestion.
    pub id: Uuid,

    /// Identity derived from title and capture time. Unique; duplicate
    /// "memorize" requests for the same key resolve to one page.
    pub source_key: String,

    /// Page title as captured.
    pub title: String,

    /// Raw captured text.
    pub content: String,

    /// First [`PREVIEW_CHARS`] characters of content, for listing and search.
    pub preview: String,

    /// When the page was captured by the source.
    pub captured_at: DateTime<Utc>,

    /// Number of chunks indexed for this page. Written by the ingestion
    /// pipeline after the full chunk set is committed.
    pub chunk_count: usize,

    /// When the page record was created.
    pub created_at: DateTime<Utc>,
}

impl Page {
    /// Create a new page record with a fresh id and derived fields.
    pub fn new(title: impl Into<String>, content: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        let title = title.into();
        let content = content.into();
        let source_key = Self::source_key(&title, captured_at);
        let preview = preview_of(&content);

        Self {
            id: Uuid::new_v4(),
            source_key,
            title,
            content,
            preview,
            captured_at,
            chunk_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Derive the dedup identity for a capture.
    pub fn source_key(title: &str, captured_at: DateTime<Utc>) -> String {
        format!("{}@{}", title.trim(), captured_at.timestamp_millis())
    }

    /// Set the chunk count once the chunk set is known.
    pub fn with_chunk_count(mut self, chunk_count: usize) -> Self {
        self.chunk_count = chunk_count;
        self
    }

    /// Reduce to the listing summary.
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id,
            title: self.title.clone(),
            preview: self.preview.clone(),
            captured_at: self.captured_at,
            chunk_count: self.chunk_count,
        }
    }
}

/// Listing view of a page, without the full content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub captured_at: DateTime<Utc>,
    pub chunk_count: usize,
}

impl PageSummary {
    /// Case-insensitive substring match over title and preview, mirroring the
    /// client-visible search behavior.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.preview.to_lowercase().contains(&needle)
    }
}

fn preview_of(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => content[..idx].to_string(),
        None => content.to_string(),
    }
}
