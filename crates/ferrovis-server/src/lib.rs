//! Ferrovis HTTP server.
//!
//! Wires a [`CatalogStore`] into the JSON API from `ferrovis-api`, adds the
//! operational endpoints (`/health`, `/version`, `/db-test`, `/schema-test`)
//! and applies CORS and request tracing. [`bootstrap`] applies the startup
//! policy for seeding reference data.

pub mod config;
pub mod diagnostics;

pub use config::ServerConfig;

use std::sync::Arc;

use axum::{
  Router,
  http::{HeaderValue, Method},
  routing::get,
};
use ferrovis_core::{BootstrapError, Catalog, ensure_seeded, store::CatalogStore};
use ferrovis_store_sqlite::SqliteStore;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};
use tracing::{error, info, warn};

// ─── Build info ───────────────────────────────────────────────────────────────

/// Version metadata reported by `/health` and `/version`.
///
/// `FERROVIS_COMMIT` and `FERROVIS_BUILD_DATE` are read at compile time.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
  pub version: &'static str,
  pub commit:  &'static str,
  pub date:    &'static str,
}

pub const BUILD: BuildInfo = BuildInfo {
  version: env!("CARGO_PKG_VERSION"),
  commit:  match option_env!("FERROVIS_COMMIT") {
    Some(c) => c,
    None => "unknown",
  },
  date:    match option_env!("FERROVIS_BUILD_DATE") {
    Some(d) => d,
    None => "unknown",
  },
};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the diagnostic handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CatalogStore + 'static,
{
  let cors = cors_layer(&state.config);
  let api = ferrovis_api::api_router(Arc::clone(&state.store));

  Router::new()
    .route("/health",      get(diagnostics::health))
    .route("/version",     get(diagnostics::version))
    .route("/db-test",     get(diagnostics::db_test::<S>))
    .route("/schema-test", get(diagnostics::schema_test::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(cors)
    .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
  let layer = CorsLayer::new()
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers(Any);

  if config.allows_any_origin() {
    return layer.allow_origin(Any);
  }

  let origins = config
    .allowed_origins
    .iter()
    .filter_map(|o| match HeaderValue::from_str(o) {
      Ok(v) => Some(v),
      Err(_) => {
        warn!(origin = %o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect::<Vec<_>>();
  layer.allow_origin(AllowOrigin::list(origins))
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// Seed reference data, applying the startup policy: a concurrent seeder
/// winning the race is logged and tolerated, anything else is returned.
/// Progress and counts are logged by [`ensure_seeded`] itself.
pub async fn bootstrap<S: CatalogStore>(
  store: &S,
  catalog: &Catalog,
) -> Result<(), BootstrapError> {
  match ensure_seeded(store, catalog).await {
    Ok(_) => Ok(()),
    Err(e) if !e.is_fatal() => {
      warn!(error = %e, "continuing startup");
      Ok(())
    }
    Err(e) => {
      error!(error = %e, "reference data bootstrap failed");
      Err(e)
    }
  }
}

/// Run `body` against `store`, then close the store whatever `body`
/// returned.
pub async fn with_store<T, E, F, Fut>(store: SqliteStore, body: F) -> Result<T, E>
where
  F: FnOnce(SqliteStore) -> Fut,
  Fut: Future<Output = Result<T, E>>,
{
  let outcome = body(store.clone()).await;
  match store.close().await {
    Ok(()) => info!("store closed"),
    Err(e) => warn!(error = %e, "failed to close store"),
  }
  outcome
}

// ─── Router tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use ferrovis_core::{
    store::{Batch, ClassifyFailure, StoreFailure},
    template::TemplateKind,
  };
  use serde_json::Value;
  use tower::ServiceExt as _;

  fn config(origins: &[&str]) -> ServerConfig {
    ServerConfig {
      host:            "127.0.0.1".to_string(),
      port:            8080,
      store_path:      PathBuf::from(":memory:"),
      environment:     "test".to_string(),
      allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
    }
  }

  async fn make_state(origins: &[&str]) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    bootstrap(&store, &Catalog::builtin().unwrap()).await.unwrap();
    AppState {
      store:  Arc::new(store),
      config: Arc::new(config(origins)),
    }
  }

  async fn get_json(state: AppState<SqliteStore>, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  // ── Diagnostics ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_build_info() {
    let (status, body) = get_json(make_state(&["*"]).await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
  }

  #[tokio::test]
  async fn version_names_the_service() {
    let (_, body) = get_json(make_state(&["*"]).await, "/version").await;
    assert_eq!(body["service"], "ferrovis-api");
    assert!(body["commit"].is_string());
  }

  #[tokio::test]
  async fn db_test_reports_healthy_store() {
    let (status, body) = get_json(make_state(&["*"]).await, "/db-test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
  }

  #[tokio::test]
  async fn db_test_reports_closed_store() {
    let state = make_state(&["*"]).await;
    state.store.as_ref().clone().close().await.unwrap();

    let (status, body) = get_json(state, "/db-test").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
  }

  #[tokio::test]
  async fn schema_test_shows_seed_counts_and_samples() {
    let (status, body) = get_json(make_state(&["*"]).await, "/schema-test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schema"]["total_tables"], 10);
    assert_eq!(body["seed_data"]["programs"], 2);
    assert_eq!(body["seed_data"]["exercises"], 5);
    assert_eq!(body["seed_data"]["achievements"], 7);
    assert_eq!(body["seed_data"]["fake_social_activities"], 3);
    assert_eq!(body["samples"]["fake_achievement"]["name"], "Gym Whisperer");
    assert_eq!(body["samples"]["fake_social_activity"]["fake_user"], "Mike_Fitness");
  }

  #[tokio::test]
  async fn api_is_nested() {
    let (status, body) = get_json(make_state(&["*"]).await, "/api/programs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["programs"].as_array().unwrap().len(), 2);
  }

  // ── CORS ────────────────────────────────────────────────────────────────────

  async fn preflight(state: AppState<SqliteStore>, origin: &str) -> Option<String> {
    let req = Request::builder()
      .method(Method::OPTIONS)
      .uri("/api/programs")
      .header(header::ORIGIN, origin)
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
      .body(Body::empty())
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    resp
      .headers()
      .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
      .map(|v| v.to_str().unwrap().to_owned())
  }

  #[tokio::test]
  async fn wildcard_origin_allows_anyone() {
    let allowed = preflight(make_state(&["*"]).await, "https://elsewhere.example").await;
    assert_eq!(allowed.as_deref(), Some("*"));
  }

  #[tokio::test]
  async fn origin_list_is_enforced() {
    let origins = ["https://app.ferrovis.example"];

    let allowed = preflight(make_state(&origins).await, "https://app.ferrovis.example").await;
    assert_eq!(allowed.as_deref(), Some("https://app.ferrovis.example"));

    let denied = preflight(make_state(&origins).await, "https://elsewhere.example").await;
    assert_eq!(denied, None);
  }

  // ── Startup policy ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn bootstrap_tolerates_concurrent_seeder() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let catalog = Catalog::builtin().unwrap();
    store.insert_batch(Batch::Exercises(&catalog.exercises)).await.unwrap();

    bootstrap(&store, &catalog).await.unwrap();

    assert_eq!(store.count(TemplateKind::Program).await.unwrap(), 2);
    assert_eq!(store.count(TemplateKind::Exercise).await.unwrap(), 5);
  }

  #[tokio::test]
  async fn bootstrap_fails_on_unavailable_store() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.clone().close().await.unwrap();

    let err = bootstrap(&store, &Catalog::builtin().unwrap()).await.unwrap_err();
    assert!(matches!(err, BootstrapError::StoreUnavailable { .. }));
    assert!(err.is_fatal());
  }

  #[tokio::test]
  async fn with_store_closes_after_failure() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let witness = store.clone();

    let result = with_store(store, |s| async move {
      s.ping().await.unwrap();
      Err::<(), _>("seeding failed")
    })
    .await;

    assert_eq!(result, Err("seeding failed"));
    let err = witness.ping().await.unwrap_err();
    assert_eq!(err.failure(), StoreFailure::Unavailable);
  }

  // ── Logging ─────────────────────────────────────────────────────────────────

  #[derive(Clone, Default)]
  struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

  impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
  }

  #[tokio::test]
  async fn cold_start_logs_seed_counts_once() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_ansi(false)
      .with_writer(move || writer.clone())
      .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let store = SqliteStore::open_in_memory().await.unwrap();
    bootstrap(&store, &Catalog::builtin().unwrap()).await.unwrap();

    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert_eq!(logs.matches("reference data seeded").count(), 1, "{logs}");
    assert!(logs.contains("programs=2"), "{logs}");
  }
}
