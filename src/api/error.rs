//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domain::errors::CoreError;

/// Error wrapper implementing `IntoResponse`.
///
/// The body carries enough detail for the UI to show a message; provider
/// secrets never appear in `CoreError` messages, so passing them through is
/// safe.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::EmptyContent | CoreError::InvalidChunking(_) => StatusCode::BAD_REQUEST,
            CoreError::PageNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Provider { .. } => StatusCode::BAD_GATEWAY,
            CoreError::DimensionMismatch { .. }
            | CoreError::EmbeddingModelMismatch { .. }
            | CoreError::PartialIngestion { .. }
            | CoreError::Database(_)
            | CoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let body = Json(json!({
            "status": "error",
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_for(err: CoreError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn statuses_match_error_classes() {
        assert_eq!(status_for(CoreError::EmptyContent), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(CoreError::PageNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(CoreError::Provider { status: Some(500), message: "x".into() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(CoreError::EmbeddingModelMismatch {
                index_model: "a".into(),
                query_model: "b".into(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
