use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::common::ApiResponse;
use crate::storage::StoreError;

/// Failures reported to HTTP callers as `{ success: false, error }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("unknown cursor: {0}")]
    UnknownCursor(String),
    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownCursor(cursor) => ApiError::UnknownCursor(cursor),
            other => ApiError::Store(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UnknownCursor(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(err) => log::error!("Request failed: {err}"),
            other => log::warn!("Rejected request: {other}"),
        }
        let body = ApiResponse::<()>::err(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
