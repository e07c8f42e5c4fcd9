//! Read-only listings of seeded exercise and achievement templates.

use std::sync::Arc;

use axum::{Json, extract::State};
use ferrovis_core::store::CatalogStore;
use serde_json::{Value, json};

use crate::error::ApiError;

/// `GET /exercises`
pub async fn exercises<S>(State(store): State<Arc<S>>) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
{
  let exercises = store.list_exercises().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "status": "ok", "exercises": exercises })))
}

/// `GET /achievements`
pub async fn achievements<S>(State(store): State<Arc<S>>) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
{
  let achievements = store.list_achievements().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "status": "ok", "achievements": achievements })))
}
