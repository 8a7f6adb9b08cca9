//! Mapping from domain errors to HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::assistant::AssistantError;
use crate::forecast::ForecastError;
use crate::model::ValidationError;
use crate::sim::EstimateError;
use crate::store::StoreError;

use super::types::ErrorResponse;

/// Error returned by every handler; renders as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => Self::NotFound(e.to_string()),
            StoreError::Unavailable(_) => {
                tracing::error!("{e}");
                Self::Internal("storage unavailable".to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<EstimateError> for ApiError {
    fn from(e: EstimateError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<AssistantError> for ApiError {
    fn from(e: AssistantError) -> Self {
        tracing::error!("chat error: {e}");
        Self::Internal("Chat request failed".to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}
