//! JSON REST API for Ferrovis.
//!
//! Exposes an axum [`Router`] backed by any [`ferrovis_core::store::CatalogStore`].
//! Diagnostics, CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ferrovis_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod placeholder;
pub mod programs;
pub mod templates;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use ferrovis_core::store::CatalogStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CatalogStore + 'static,
{
  Router::new()
    // Auth and users
    .route("/auth/register", post(placeholder::register))
    .route("/auth/login", post(placeholder::login))
    .route(
      "/user/profile",
      get(placeholder::get_profile).put(placeholder::update_profile),
    )
    // Workouts
    .route(
      "/workouts",
      get(placeholder::list_workouts).post(placeholder::create_workout),
    )
    .route("/workouts/{id}", get(placeholder::get_workout))
    // Programs
    .route("/programs", get(programs::list::<S>))
    .route("/programs/{id}", get(programs::get_one::<S>))
    .route("/programs/{id}/next-workout", get(programs::next_workout::<S>))
    // Templates
    .route("/exercises", get(templates::exercises::<S>))
    .route("/achievements", get(templates::achievements::<S>))
    // Buddies
    .route("/buddies", get(placeholder::list_buddies))
    .route("/buddies/invite", post(placeholder::invite_buddy))
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
  };
  use ferrovis_core::{Catalog, ensure_seeded};
  use ferrovis_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  async fn seeded_store() -> Arc<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    ensure_seeded(&store, &Catalog::builtin().unwrap()).await.unwrap();
    Arc::new(store)
  }

  async fn send(store: Arc<SqliteStore>, method: Method, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::empty())
      .unwrap();
    let resp = api_router(store).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn lists_seeded_programs() {
    let (status, body) = send(seeded_store().await, Method::GET, "/programs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let programs = body["programs"].as_array().unwrap();
    assert_eq!(programs.len(), 2);
    assert_eq!(programs[0]["name"], "Starting Strength");
    assert_eq!(programs[0]["duration_weeks"], 12);
  }

  #[tokio::test]
  async fn missing_program_is_404() {
    let (status, body) = send(seeded_store().await, Method::GET, "/programs/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Program not found");
  }

  #[tokio::test]
  async fn non_numeric_program_id_is_a_json_400() {
    let store = seeded_store().await;
    for uri in ["/programs/abc", "/programs/abc/next-workout"] {
      let (status, body) = send(store.clone(), Method::GET, uri).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
      assert_eq!(body["status"], "error");
      assert!(body["message"].as_str().unwrap().starts_with("invalid program id"));
    }
  }

  #[tokio::test]
  async fn next_workout_uses_program_structure() {
    let store = seeded_store().await;

    let (status, body) = send(store.clone(), Method::GET, "/programs/2/next-workout").await;
    assert_eq!(status, StatusCode::OK);
    let workout = &body["next_workout"];
    assert_eq!(workout["program_name"], "StrongLifts 5x5");
    assert_eq!(workout["workout_day"], "A");
    assert_eq!(workout["exercises"].as_array().unwrap().len(), 3);
    assert_eq!(workout["exercises"][0]["sets"], 5);
    assert!(
      workout["exercises"][1]["instructions"]
        .as_str()
        .unwrap()
        .starts_with("Lie on bench")
    );

    let (_, body) = send(store, Method::GET, "/programs/1/next-workout").await;
    assert_eq!(body["next_workout"]["exercises"][0]["sets"], 3);
  }

  #[tokio::test]
  async fn lists_templates() {
    let store = seeded_store().await;

    let (_, body) = send(store.clone(), Method::GET, "/exercises").await;
    assert_eq!(body["exercises"].as_array().unwrap().len(), 5);

    let (_, body) = send(store, Method::GET, "/achievements").await;
    let achievements = body["achievements"].as_array().unwrap();
    assert_eq!(achievements.len(), 7);
    assert_eq!(
      achievements
        .iter()
        .filter(|a| a["is_fake_achievement"] == true)
        .count(),
      1
    );
  }

  #[tokio::test]
  async fn unbuilt_routes_answer_501() {
    let store = seeded_store().await;
    for (method, uri) in [
      (Method::POST, "/auth/register"),
      (Method::POST, "/auth/login"),
      (Method::PUT, "/user/profile"),
      (Method::GET, "/workouts/7"),
      (Method::POST, "/buddies/invite"),
    ] {
      let (status, body) = send(store.clone(), method, uri).await;
      assert_eq!(status, StatusCode::NOT_IMPLEMENTED, "{uri}");
      assert_eq!(body["status"], "error");
    }
  }
}
