//! Handlers for `/programs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/programs` | All seeded programs |
//! | `GET`  | `/programs/:id` | 404 if not found, 400 if the id is not a number |
//! | `GET`  | `/programs/:id/next-workout` | Day-A session for the program |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use ferrovis_core::{store::CatalogStore, template::Program};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ApiError;

/// Lifts trained on day A of an A/B alternating schedule.
const DAY_A: [&str; 3] = ["Squat", "Bench Press", "Barbell Row"];
const DEFAULT_SETS: u64 = 3;
const DEFAULT_REPS: u64 = 5;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /programs`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
{
  let programs = store.list_programs().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "status": "ok", "programs": programs })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// Unwrap a program id, answering malformed ids with a JSON 400.
fn program_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
  id.map(|Path(id)| id)
    .map_err(|e| ApiError::BadRequest(format!("invalid program id: {}", e.body_text())))
}

async fn find<S: CatalogStore>(store: &S, id: i64) -> Result<Program, ApiError> {
  store
    .get_program(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Program not found".to_owned()))
}

/// `GET /programs/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
{
  let program = find(store.as_ref(), program_id(id)?).await?;
  Ok(Json(json!({ "status": "ok", "program": program })))
}

// ─── Next workout ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PlannedExercise {
  pub name:         String,
  pub sets:         u64,
  pub reps:         u64,
  /// Placeholder until per-user progression exists.
  pub weight:       &'static str,
  pub instructions: String,
}

#[derive(Debug, Serialize)]
pub struct NextWorkout {
  pub program_name:       String,
  pub workout_day:        &'static str,
  pub exercises:          Vec<PlannedExercise>,
  pub estimated_duration: &'static str,
  pub rest_between_sets:  &'static str,
}

/// `GET /programs/:id/next-workout`
///
/// Always day A: nothing tracks which session a user did last. Sets and reps
/// come from the program structure when it declares them.
pub async fn next_workout<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
{
  let program = find(store.as_ref(), program_id(id)?).await?;
  let catalog = store.list_exercises().await.map_err(ApiError::store)?;

  let structure = &program.template.structure;
  let sets = structure["sets"].as_u64().unwrap_or(DEFAULT_SETS);
  let reps = structure["reps"].as_u64().unwrap_or(DEFAULT_REPS);

  let exercises = DAY_A
    .iter()
    .map(|name| PlannedExercise {
      name: (*name).to_owned(),
      sets,
      reps,
      weight: "start_weight + progression",
      instructions: catalog
        .iter()
        .find(|e| e.template.name == *name)
        .map(|e| e.template.instructions.clone())
        .unwrap_or_default(),
    })
    .collect();

  let workout = NextWorkout {
    program_name: program.template.name,
    workout_day: "A",
    exercises,
    estimated_duration: "45-60 minutes",
    rest_between_sets: "3-5 minutes for compound movements",
  };
  Ok(Json(json!({ "status": "ok", "next_workout": workout })))
}
