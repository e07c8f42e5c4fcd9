//! Operational endpoints mounted at the root, outside `/api`.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use ferrovis_api::ApiError;
use ferrovis_core::{store::CatalogStore, template::TemplateKind};
use ferrovis_store_sqlite::schema::TABLES;
use serde_json::{Value, json};

use crate::{AppState, BUILD};

/// `GET /health`
pub async fn health() -> Json<Value> {
  Json(json!({
    "status":     "ok",
    "message":    "Ferrovis API is running",
    "version":    BUILD.version,
    "commit":     BUILD.commit,
    "build_date": BUILD.date,
  }))
}

/// `GET /version`
pub async fn version() -> Json<Value> {
  Json(json!({
    "version":    BUILD.version,
    "commit":     BUILD.commit,
    "build_date": BUILD.date,
    "service":    "ferrovis-api",
  }))
}

/// `GET /db-test`
pub async fn db_test<S: CatalogStore>(State(state): State<AppState<S>>) -> Response {
  match state.store.ping().await {
    Ok(()) => Json(json!({
      "status":  "ok",
      "message": "Database connection is healthy",
    }))
    .into_response(),
    Err(e) => {
      tracing::warn!(error = %e, "database ping failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
          "status":  "error",
          "message": "Database ping failed",
          "error":   e.to_string(),
        })),
      )
        .into_response()
    }
  }
}

/// `GET /schema-test`
///
/// Row counts per template table plus one sample of the fabricated content,
/// handy for eyeballing a fresh deployment.
pub async fn schema_test<S: CatalogStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Value>, ApiError> {
  let store = state.store.as_ref();

  let mut seed_data = serde_json::Map::new();
  for kind in TemplateKind::ALL {
    let n = store.count(kind).await.map_err(ApiError::store)?;
    seed_data.insert(kind.table().to_owned(), n.into());
  }

  let fake_achievement = store
    .list_achievements()
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .find(|a| a.template.is_fake_achievement)
    .map(|a| {
      json!({
        "name":           a.template.name,
        "description":    a.template.description,
        "weasel_message": a.template.weasel_message,
        "rarity_percent": a.template.rarity_percent,
      })
    });

  let fake_activity = store
    .list_fake_activities()
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .next()
    .map(|f| {
      json!({
        "fake_user": f.template.fake_user_name,
        "activity":  f.template.details,
        "type":      f.template.activity_type,
      })
    });

  Ok(Json(json!({
    "status":    "ok",
    "message":   "Ferrovis database schema",
    "schema":    { "total_tables": TABLES.len(), "tables": TABLES },
    "seed_data": seed_data,
    "samples":   {
      "fake_achievement":     fake_achievement,
      "fake_social_activity": fake_activity,
    },
  })))
}
