//! Deterministic local embedder.
//!
//! Hashed bag-of-words: each token is hashed into one of `dimension`
//! buckets, bucket counts form the vector, and the vector is L2-normalized.
//! Texts sharing vocabulary land near each other under cosine similarity,
//! which is enough for an offline default and for exercising the retrieval
//! path without a network or model download. No randomness: same text, same
//! vector, always.

use async_trait::async_trait;

use crate::domain::errors::CoreResult;
use crate::domain::ports::EmbeddingProvider;

pub struct HashedBagEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashedBagEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            model_id: format!("hashed-bow-v1-{dimension}"),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let bucket = fnv1a(token) as usize % self.dimension;
            vector[bucket] += 1.0;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for val in &mut vector {
                *val /= magnitude;
            }
        }

        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

/// FNV-1a over the lowercased token bytes.
fn fnv1a(token: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for c in token.chars().flat_map(char::to_lowercase) {
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}

#[async_trait]
impl EmbeddingProvider for HashedBagEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> CoreResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
