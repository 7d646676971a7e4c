//! HTTP rendering of service failures

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dbadmin_services::ServiceError;

/// A [`ServiceError`] on its way to the client as `{"error": "<kind>"}`
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::UnsupportedRoutineKind(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::EmptyInput(_) | ServiceError::InvalidName(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidQuery(_)
            | ServiceError::ExportFailed(_)
            | ServiceError::ImportFailed(_)
            | ServiceError::SchemaNotSupported => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self.0, "request failed");
        (status, Json(serde_json::json!({ "error": self.0.kind() }))).into_response()
    }
}
