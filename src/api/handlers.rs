//! HTTP request handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::api::types::{
    ApiConfigRequest, ApiConfigsResponse, ChatRequest, ChatResponse, HealthResponse,
    MemorizeRequest, MemorizeResponse, PageDetailResponse, PagesQuery, PagesResponse,
    SettingsResponse, StatusResponse,
};
use crate::domain::models::ApiConfigRecord;

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let stored_pages = state.engine.stored_pages().await?;
    Ok(Json(HealthResponse {
        message: "retrace core is running",
        version: env!("CARGO_PKG_VERSION"),
        stored_pages,
    }))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    debug!(mode = ?request.mode, "chat request");
    let response = state.engine.chat(&request.message, request.mode).await?;
    Ok(Json(ChatResponse { response, status: "success" }))
}

pub async fn memorize(
    State(state): State<AppState>,
    Json(request): Json<MemorizeRequest>,
) -> Result<Json<MemorizeResponse>, ApiError> {
    let captured_at = request.captured_at.unwrap_or_else(Utc::now);
    let receipt = state
        .engine
        .memorize(&request.title, &request.content, captured_at)
        .await?;

    Ok(Json(MemorizeResponse {
        page_id: receipt.page_id,
        chunk_count: receipt.chunk_count,
        title: request.title,
        status: if receipt.deduplicated { "duplicate" } else { "success" },
    }))
}

pub async fn list_pages(
    State(state): State<AppState>,
    Query(query): Query<PagesQuery>,
) -> Result<Json<PagesResponse>, ApiError> {
    let pages = state.engine.pages(query.q.as_deref()).await?;
    Ok(Json(PagesResponse { pages }))
}

pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageDetailResponse>, ApiError> {
    let page = state.engine.page(id).await?;
    Ok(Json(PageDetailResponse {
        id: page.id,
        title: page.title,
        content: page.content,
        captured_at: page.captured_at,
        chunk_count: page.chunk_count,
    }))
}

pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.engine.forget(id).await?;
    Ok(Json(StatusResponse { status: "deleted" }))
}

pub async fn list_api_configs(
    State(state): State<AppState>,
) -> Result<Json<ApiConfigsResponse>, ApiError> {
    let configs = state.engine.profiles().list_api_configs().await?;
    Ok(Json(ApiConfigsResponse { configs }))
}

pub async fn upsert_api_config(
    State(state): State<AppState>,
    Json(request): Json<ApiConfigRequest>,
) -> Result<Json<ApiConfigRecord>, ApiError> {
    let record = ApiConfigRecord {
        id: Uuid::new_v4(),
        name: request.name,
        kind: request.kind,
        base_url: request.base_url,
        model: request.model,
        api_key: request.api_key,
        created_at: Utc::now(),
    };

    state.engine.profiles().upsert_api_config(&record).await?;
    Ok(Json(record))
}

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = state.engine.profiles().all_settings().await?;
    Ok(Json(SettingsResponse { settings }))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<StatusResponse>, ApiError> {
    for (key, value) in &settings {
        state.engine.profiles().set_setting(key, value).await?;
    }
    Ok(Json(StatusResponse { status: "success" }))
}
