//! SQLite-backed embedding index.
//!
//! Chunk text and vector live in one table; vectors are stored as
//! little-endian f32 BLOBs. Search scans candidates and ranks by cosine
//! similarity in Rust, which is plenty for a per-user browsing index. rowid
//! order is the tie-break, so equal scores resolve to the earlier insert.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{EmbeddingRecord, IndexMetadata, SearchHit};
use crate::domain::ports::VectorIndex;

#[derive(Clone)]
pub struct SqliteVectorIndex {
    pool: SqlitePool,
}

impl SqliteVectorIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Serialize a vector to little-endian bytes for storage.
    fn vector_to_bytes(vector: &[f32]) -> Vec<u8> {
        vector.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize a stored vector.
    fn bytes_to_vector(bytes: &[u8]) -> CoreResult<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return Err(CoreError::Database(format!(
                "corrupt embedding blob of {} bytes",
                bytes.len()
            )));
        }

        Ok(bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }

    /// Cosine similarity in [-1, 1]; zero-magnitude vectors score 0.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return 0.0;
        }

        dot / (mag_a * mag_b)
    }
}

#[async_trait]
impl VectorIndex for SqliteVectorIndex {
    async fn metadata(&self) -> CoreResult<Option<IndexMetadata>> {
        let row = sqlx::query("SELECT model_id, dimension FROM index_meta WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| IndexMetadata {
            model_id: r.get("model_id"),
            dimension: r.get::<i64, _>("dimension") as usize,
        }))
    }

    async fn bind_model(&self, model_id: &str, dimension: usize) -> CoreResult<IndexMetadata> {
        if let Some(existing) = self.metadata().await? {
            if existing.model_id != model_id {
                return Err(CoreError::EmbeddingModelMismatch {
                    index_model: existing.model_id,
                    query_model: model_id.to_string(),
                });
            }
            if existing.dimension != dimension {
                return Err(CoreError::DimensionMismatch {
                    expected: existing.dimension,
                    actual: dimension,
                });
            }
            return Ok(existing);
        }

        // OR IGNORE tolerates a concurrent first bind; the re-read below
        // settles who won and whether it agrees with us.
        sqlx::query(
            "INSERT OR IGNORE INTO index_meta (id, model_id, dimension, created_at) VALUES (1, ?, ?, ?)",
        )
        .bind(model_id)
        .bind(dimension as i64)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let bound = self.metadata().await?.ok_or_else(|| {
            CoreError::Database("index metadata missing after bind".to_string())
        })?;

        if bound.model_id != model_id {
            return Err(CoreError::EmbeddingModelMismatch {
                index_model: bound.model_id,
                query_model: model_id.to_string(),
            });
        }

        Ok(bound)
    }

    async fn add(&self, record: &EmbeddingRecord) -> CoreResult<()> {
        let meta = self.metadata().await?.ok_or_else(|| CoreError::Database(
            "index is unbound; call bind_model before add".to_string(),
        ))?;

        if record.vector.len() != meta.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: meta.dimension,
                actual: record.vector.len(),
            });
        }

        sqlx::query(
            r#"INSERT OR REPLACE INTO chunks (chunk_id, page_id, seq, content, embedding)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&record.chunk_id)
        .bind(record.page_id.to_string())
        .bind(record.seq as i64)
        .bind(&record.content)
        .bind(Self::vector_to_bytes(&record.vector))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_page(&self, page_id: Uuid) -> CoreResult<u64> {
        let result = sqlx::query("DELETE FROM chunks WHERE page_id = ?")
            .bind(page_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn search(&self, query: &[f32], k: usize, min_score: f32) -> CoreResult<Vec<SearchHit>> {
        let Some(meta) = self.metadata().await? else {
            return Ok(Vec::new());
        };

        if query.len() != meta.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: meta.dimension,
                actual: query.len(),
            });
        }

        let rows = sqlx::query(
            "SELECT chunk_id, page_id, content, embedding FROM chunks ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut hits = Vec::new();
        for row in rows {
            let vector = Self::bytes_to_vector(&row.get::<Vec<u8>, _>("embedding"))?;
            let score = Self::cosine_similarity(query, &vector);
            if score < min_score {
                continue;
            }

            let page_id_raw: String = row.get("page_id");
            hits.push(SearchHit {
                chunk_id: row.get("chunk_id"),
                page_id: Uuid::parse_str(&page_id_raw)
                    .map_err(|e| CoreError::Database(format!("invalid page id '{page_id_raw}': {e}")))?,
                content: row.get("content"),
                score,
            });
        }

        // Stable sort keeps rowid order for equal scores.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        Ok(hits)
    }

    async fn count_for_page(&self, page_id: Uuid) -> CoreResult<u64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chunks WHERE page_id = ?")
            .bind(page_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as u64)
    }
}
