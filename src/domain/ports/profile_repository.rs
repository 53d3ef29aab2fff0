//! Provider-profile and settings storage port.
//!
//! Opaque key-value persistence for the settings UI. Not part of the hard
//! core; kept behind a port so the HTTP layer stays storage-agnostic.

use async_trait::async_trait;

use crate::domain::errors::CoreResult;
use crate::domain::models::ApiConfigRecord;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert or update a named provider config.
    async fn upsert_api_config(&self, record: &ApiConfigRecord) -> CoreResult<()>;

    /// All stored provider configs, oldest first.
    async fn list_api_configs(&self) -> CoreResult<Vec<ApiConfigRecord>>;

    /// Fetch a provider config by name.
    async fn get_api_config(&self, name: &str) -> CoreResult<Option<ApiConfigRecord>>;

    /// Store one settings entry.
    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> CoreResult<()>;

    /// Fetch one settings entry.
    async fn get_setting(&self, key: &str) -> CoreResult<Option<serde_json::Value>>;

    /// All settings as a JSON object.
    async fn all_settings(&self) -> CoreResult<serde_json::Map<String, serde_json::Value>>;
}
