//! The `CatalogStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `ferrovis-store-sqlite`).
//! The bootstrapper and the HTTP layer depend on this abstraction, not on any
//! concrete backend. Connection lifecycle stays with whoever built the store.

use std::future::Future;

use crate::template::{
  Achievement, AchievementTemplate, Exercise, ExerciseTemplate, FakeSocialActivity,
  FakeSocialActivityTemplate, Program, ProgramTemplate, TemplateKind,
};

// ─── Failure classification ──────────────────────────────────────────────────

/// How a store failure should be interpreted by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
  /// Connectivity or transport problem; nothing can be said about the data.
  Unavailable,
  /// A unique key already exists.
  UniqueViolation,
  /// Any other column constraint (CHECK, NOT NULL, foreign key).
  ConstraintViolation,
}

/// Implemented by store error types so constraint violations can be told
/// apart from connectivity errors.
pub trait ClassifyFailure {
  fn failure(&self) -> StoreFailure;
}

// ─── Batches ─────────────────────────────────────────────────────────────────

/// One entity kind's worth of catalog rows, inserted as a single unit.
#[derive(Debug, Clone, Copy)]
pub enum Batch<'a> {
  Programs(&'a [ProgramTemplate]),
  Exercises(&'a [ExerciseTemplate]),
  Achievements(&'a [AchievementTemplate]),
  FakeActivities(&'a [FakeSocialActivityTemplate]),
}

impl Batch<'_> {
  pub fn kind(&self) -> TemplateKind {
    match self {
      Self::Programs(_) => TemplateKind::Program,
      Self::Exercises(_) => TemplateKind::Exercise,
      Self::Achievements(_) => TemplateKind::Achievement,
      Self::FakeActivities(_) => TemplateKind::FakeSocialActivity,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Self::Programs(rows) => rows.len(),
      Self::Exercises(rows) => rows.len(),
      Self::Achievements(rows) => rows.len(),
      Self::FakeActivities(rows) => rows.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Ferrovis template store.
///
/// Template rows are write-once: the only write is [`insert_batch`], which
/// must be atomic per call. The schema (tables and unique keys) must exist
/// before any method is called.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
///
/// [`insert_batch`]: CatalogStore::insert_batch
pub trait CatalogStore: Send + Sync {
  type Error: ClassifyFailure + std::error::Error + Send + Sync + 'static;

  /// Round-trip to the backend without touching any table.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Number of rows in the table backing `kind`.
  fn count(
    &self,
    kind: TemplateKind,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Insert every row of `batch` or none of them. Returns the number of rows
  /// written.
  ///
  /// A natural-key collision must surface as an error classified
  /// [`StoreFailure::UniqueViolation`].
  fn insert_batch<'a>(
    &'a self,
    batch: Batch<'a>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn list_programs(&self) -> impl Future<Output = Result<Vec<Program>, Self::Error>> + Send + '_;

  /// Retrieve a program by id. Returns `None` if not found.
  fn get_program(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Program>, Self::Error>> + Send + '_;

  fn list_exercises(
    &self,
  ) -> impl Future<Output = Result<Vec<Exercise>, Self::Error>> + Send + '_;

  fn list_achievements(
    &self,
  ) -> impl Future<Output = Result<Vec<Achievement>, Self::Error>> + Send + '_;

  /// Fake activity ordered newest first.
  fn list_fake_activities(
    &self,
  ) -> impl Future<Output = Result<Vec<FakeSocialActivity>, Self::Error>> + Send + '_;
}
