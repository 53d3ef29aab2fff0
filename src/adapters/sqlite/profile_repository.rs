//! SQLite implementation of provider-profile and settings storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{ApiConfigRecord, ProviderKind};
use crate::domain::ports::ProfileRepository;

#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn upsert_api_config(&self, record: &ApiConfigRecord) -> CoreResult<()> {
        sqlx::query(
            r#"INSERT INTO api_configs (id, name, kind, base_url, model, api_key, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(name) DO UPDATE SET
                   kind = excluded.kind,
                   base_url = excluded.base_url,
                   model = excluded.model,
                   api_key = excluded.api_key"#,
        )
        .bind(record.id.to_string())
        .bind(&record.name)
        .bind(record.kind.as_str())
        .bind(&record.base_url)
        .bind(&record.model)
        .bind(&record.api_key)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_api_configs(&self) -> CoreResult<Vec<ApiConfigRecord>> {
        let rows = sqlx::query("SELECT * FROM api_configs ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn get_api_config(&self, name: &str) -> CoreResult<Option<ApiConfigRecord>> {
        let row = sqlx::query("SELECT * FROM api_configs WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> CoreResult<()> {
        sqlx::query(
            r#"INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(serde_json::to_string(value)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_setting(&self, key: &str) -> CoreResult<Option<serde_json::Value>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| serde_json::from_str(&r.get::<String, _>("value")).map_err(CoreError::from))
            .transpose()
    }

    async fn all_settings(&self) -> CoreResult<serde_json::Map<String, serde_json::Value>> {
        let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        let mut map = serde_json::Map::new();
        for row in rows {
            let key: String = row.get("key");
            let value: serde_json::Value = serde_json::from_str(&row.get::<String, _>("value"))?;
            map.insert(key, value);
        }

        Ok(map)
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> CoreResult<ApiConfigRecord> {
    let id_raw: String = row.get("id");
    let kind_raw: String = row.get("kind");
    let created_raw: String = row.get("created_at");

    Ok(ApiConfigRecord {
        id: Uuid::parse_str(&id_raw)
            .map_err(|e| CoreError::Database(format!("invalid uuid '{id_raw}': {e}")))?,
        name: row.get("name"),
        kind: ProviderKind::parse(&kind_raw)
            .ok_or_else(|| CoreError::Database(format!("unknown provider kind '{kind_raw}'")))?,
        base_url: row.get("base_url"),
        model: row.get("model"),
        api_key: row.get("api_key"),
        created_at: DateTime::parse_from_rfc3339(&created_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CoreError::Database(format!("invalid timestamp '{created_raw}': {e}")))?,
    })
}
