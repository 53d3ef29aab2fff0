//! Chunking configuration.
//!
//! Splitting parameters are policy, not hard-coded behavior. Defaults match
//! the product's capture granularity (1000 chars, 200 overlap).

use serde::{Deserialize, Serialize};

/// Configuration for splitting page content into chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters.
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,

    /// Prefer splitting at sentence/whitespace boundaries near the window
    /// edge instead of cutting mid-word.
    pub respect_boundaries: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            respect_boundaries: true,
        }
    }
}

impl ChunkingConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be less than chunk_size".to_string());
        }
        Ok(())
    }

    /// Window advance between consecutive chunks.
    pub fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}
