//! Request and response bodies for the HTTP boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::{ChatMode, PageSummary, ProviderKind};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub mode: ChatMode,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MemorizeRequest {
    pub title: String,
    pub content: String,
    /// Capture time reported by the source; defaults to receipt time.
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MemorizeResponse {
    pub page_id: Uuid,
    pub chunk_count: usize,
    pub title: String,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PagesQuery {
    /// Case-insensitive substring filter over title and preview.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PagesResponse {
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Serialize)]
pub struct PageDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub captured_at: DateTime<Utc>,
    pub chunk_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub stored_pages: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfigRequest {
    pub name: String,
    pub kind: ProviderKind,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiConfigsResponse {
    pub configs: Vec<crate::domain::models::ApiConfigRecord>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: serde_json::Map<String, serde_json::Value>,
}
