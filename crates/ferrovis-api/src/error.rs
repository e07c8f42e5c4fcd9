//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  /// Route exists but its business logic has not been built.
  #[error("{0} is not implemented yet")]
  NotImplemented(&'static str),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error while handling request");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "status": "error", "message": self.to_string() }))).into_response()
  }
}
