//! Sliding-window text chunker.
//!
//! Splits captured page text into overlapping segments sized for embedding.
//! The window advances by `chunk_size - chunk_overlap` characters and, when
//! configured, snaps the cut to a nearby sentence or whitespace boundary so
//! chunks don't end mid-word. Deterministic for identical input and
//! parameters, which keeps re-ingestion diffable.

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::ChunkingConfig;

/// Character-window chunker.
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> CoreResult<Self> {
        config.validate().map_err(CoreError::InvalidChunking)?;
        Ok(Self { config })
    }

    /// Split `text` with the given parameters.
    pub fn chunk(text: &str, config: &ChunkingConfig) -> CoreResult<Vec<String>> {
        Self::new(config.clone()).map(|c| c.split(text))
    }

    /// Split `text` into ordered chunk texts. Empty or whitespace-only input
    /// yields an empty sequence.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        self.split_spans(&chars)
            .into_iter()
            .map(|(start, end)| chars[start..end].iter().collect())
            .collect()
    }

    /// Chunk boundaries as char-index spans over `chars`. Exposed for the
    /// coverage invariants in tests: spans are contiguous (no gaps), always
    /// advance, and never exceed `chunk_size`.
    pub fn split_spans(&self, chars: &[char]) -> Vec<(usize, usize)> {
        if chars.iter().all(|c| c.is_whitespace()) {
            return Vec::new();
        }

        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;
        // Bounding the boundary search to half a step keeps the window
        // advancing even when every snap fires.
        let lookback = (self.config.step() / 2).max(1);

        let mut spans = Vec::new();
        let mut start = 0usize;

        while start < chars.len() {
            let hard_end = (start + size).min(chars.len());
            let mut end = hard_end;

            if self.config.respect_boundaries && hard_end < chars.len() {
                if let Some(snapped) = snap_to_boundary(chars, start, hard_end, lookback) {
                    end = snapped;
                }
            }

            spans.push((start, end));

            if hard_end >= chars.len() {
                break;
            }

            start = end.saturating_sub(overlap).max(start + 1);
        }

        spans
    }
}

/// Last sentence terminator, else last whitespace, within `lookback` chars of
/// the window edge. Returns the char index just past the boundary.
fn snap_to_boundary(
    chars: &[char],
    start: usize,
    hard_end: usize,
    lookback: usize,
) -> Option<usize> {
    let floor = hard_end.saturating_sub(lookback).max(start + 1);

    for i in (floor..hard_end).rev() {
        if matches!(chars[i], '.' | '!' | '?' | '\n') {
            return Some(i + 1);
        }
    }

    for i in (floor..hard_end).rev() {
        if chars[i].is_whitespace() {
            return Some(i + 1);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkingConfig {
            chunk_size: size,
            chunk_overlap: overlap,
            respect_boundaries: true,
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Chunker::new(ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 150,
            respect_boundaries: true,
        });
        assert!(matches!(result, Err(CoreError::InvalidChunking(_))));
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = chunker(1000, 200);
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("   \n\t  ").is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunker = chunker(1000, 200);
        let chunks = chunker.split("The sky is blue.");
        assert_eq!(chunks, vec!["The sky is blue.".to_string()]);
    }

    #[test]
    fn long_text_produces_overlapping_chunks() {
        let chunker = chunker(100, 20);
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let chunks = chunker.split(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn chunks_snap_to_sentence_boundaries() {
        let chunker = chunker(60, 10);
        let text = "First sentence here. Second sentence follows. Third one is longer still.";
        let chunks = chunker.split(text);

        assert!(chunks[0].ends_with('.'), "got {:?}", chunks[0]);
    }

    #[test]
    fn chunking_is_deterministic() {
        let chunker = chunker(100, 20);
        let text = "Machine learning is a subset of artificial intelligence. ".repeat(10);
        assert_eq!(chunker.split(&text), chunker.split(&text));
    }

    #[test]
    fn spans_cover_the_text_without_gaps() {
        let chunker = chunker(50, 10);
        let text = "word ".repeat(100);
        let chars: Vec<char> = text.chars().collect();
        let spans = chunker.split_spans(&chars);

        assert_eq!(spans[0].0, 0);
        assert_eq!(spans.last().unwrap().1, chars.len());
        for pair in spans.windows(2) {
            assert!(pair[1].0 <= pair[0].1, "gap between {:?} and {:?}", pair[0], pair[1]);
            assert!(pair[1].0 > pair[0].0, "window did not advance");
        }
    }

    #[test]
    fn multibyte_text_never_panics() {
        let chunker = chunker(10, 2);
        let text = "héllo wörld çafé ".repeat(30);
        let chunks = chunker.split(&text);
        assert!(!chunks.is_empty());
        assert!(!chunks.concat().is_empty());
    }

    #[test]
    fn hard_cut_when_no_boundary_in_window() {
        let chunker = chunker(20, 5);
        let text = "a".repeat(100);
        let chunks = chunker.split(&text);
        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].chars().count(), 20);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn config_strategy() -> impl Strategy<Value = ChunkingConfig> {
        (10usize..200, 0usize..9, any::<bool>()).prop_map(|(size, overlap, snap)| ChunkingConfig {
            chunk_size: size,
            chunk_overlap: overlap.min(size.saturating_sub(1)),
            respect_boundaries: snap,
        })
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z0-9 .,!?\n]{1,2000}").expect("valid regex")
    }

    proptest! {
        #[test]
        fn proptest_determinism(text in text_strategy(), config in config_strategy()) {
            let chunker = Chunker::new(config).unwrap();
            prop_assert_eq!(chunker.split(&text), chunker.split(&text));
        }

        #[test]
        fn proptest_chunks_respect_size_limit(text in text_strategy(), config in config_strategy()) {
            let chunker = Chunker::new(config.clone()).unwrap();
            for chunk in chunker.split(&text) {
                prop_assert!(chunk.chars().count() <= config.chunk_size);
            }
        }

        #[test]
        fn proptest_spans_are_contiguous(text in text_strategy(), config in config_strategy()) {
            let chunker = Chunker::new(config).unwrap();
            let chars: Vec<char> = text.chars().collect();
            let spans = chunker.split_spans(&chars);

            if text.trim().is_empty() {
                prop_assert!(spans.is_empty());
            } else {
                prop_assert_eq!(spans[0].0, 0);
                prop_assert_eq!(spans.last().unwrap().1, chars.len());
                for pair in spans.windows(2) {
                    prop_assert!(pair[1].0 <= pair[0].1);
                    prop_assert!(pair[1].0 > pair[0].0);
                }
            }
        }

        #[test]
        fn proptest_chunks_are_substrings(text in text_strategy(), config in config_strategy()) {
            let chunker = Chunker::new(config).unwrap();
            for chunk in chunker.split(&text) {
                prop_assert!(text.contains(&chunk));
            }
        }
    }
}
