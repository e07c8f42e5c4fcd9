//! Reference-data bootstrapper.
//!
//! [`ensure_seeded`] populates the four template tables from a [`Catalog`]
//! the first time it runs against a store and is a no-op afterwards. It is
//! meant to be awaited once during startup, after the schema exists and
//! before the HTTP listener accepts requests.
//!
//! The "already seeded" guard only counts programs. A store that holds
//! programs but is missing other kinds (an earlier run died half way) is
//! reported as seeded and left alone.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
  catalog::Catalog,
  error::{BootstrapError, Result, Stage},
  store::{Batch, CatalogStore, ClassifyFailure, StoreFailure},
  template::TemplateKind,
};

/// Rows written per kind by one bootstrap run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
  pub programs:        usize,
  pub exercises:       usize,
  pub achievements:    usize,
  pub fake_activities: usize,
}

impl SeedCounts {
  /// Rows written for `kind`.
  pub fn get(&self, kind: TemplateKind) -> usize {
    match kind {
      TemplateKind::Program => self.programs,
      TemplateKind::Exercise => self.exercises,
      TemplateKind::Achievement => self.achievements,
      TemplateKind::FakeSocialActivity => self.fake_activities,
    }
  }

  fn record(&mut self, kind: TemplateKind, rows: usize) {
    match kind {
      TemplateKind::Program => self.programs += rows,
      TemplateKind::Exercise => self.exercises += rows,
      TemplateKind::Achievement => self.achievements += rows,
      TemplateKind::FakeSocialActivity => self.fake_activities += rows,
    }
  }
}

/// Outcome of a successful [`ensure_seeded`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReport {
  /// The guard found existing programs; nothing was written.
  AlreadySeeded { programs: u64 },
  Seeded(SeedCounts),
}

/// Seed `store` from `catalog` unless it already holds programs.
pub async fn ensure_seeded<S: CatalogStore>(store: &S, catalog: &Catalog) -> Result<SeedReport> {
  ensure_seeded_at(store, catalog, Utc::now()).await
}

/// [`ensure_seeded`] with an explicit clock; fake activity timestamps are
/// offset from `now`.
pub async fn ensure_seeded_at<S: CatalogStore>(
  store: &S,
  catalog: &Catalog,
  now: DateTime<Utc>,
) -> Result<SeedReport> {
  info!("seeding reference data");

  let programs = store
    .count(TemplateKind::Program)
    .await
    .map_err(|e| BootstrapError::StoreUnavailable {
      stage:  Stage::Guard,
      source: Box::new(e),
    })?;
  if programs > 0 {
    info!(programs, "reference data already present, skipping seed");
    return Ok(SeedReport::AlreadySeeded { programs });
  }

  catalog
    .validate()
    .map_err(|e| BootstrapError::InvalidCatalogEntry {
      kind:   e.kind().unwrap_or(TemplateKind::Program),
      source: Box::new(e),
    })?;

  let activities = catalog.fake_activities_at(now);
  let batches = [
    Batch::Programs(&catalog.programs),
    Batch::Exercises(&catalog.exercises),
    Batch::Achievements(&catalog.achievements),
    Batch::FakeActivities(&activities),
  ];

  let mut counts = SeedCounts::default();
  let mut conflicts = Vec::new();

  for batch in batches {
    let kind = batch.kind();
    if batch.is_empty() {
      continue;
    }

    match store.insert_batch(batch).await {
      Ok(rows) => {
        debug!(%kind, rows, "batch inserted");
        counts.record(kind, rows);
      }
      Err(e) => match e.failure() {
        StoreFailure::UniqueViolation => {
          warn!(%kind, error = %e, "batch already inserted by a concurrent seeder");
          conflicts.push(kind);
        }
        StoreFailure::ConstraintViolation => {
          return Err(BootstrapError::InvalidCatalogEntry { kind, source: Box::new(e) });
        }
        StoreFailure::Unavailable => {
          return Err(BootstrapError::StoreUnavailable {
            stage:  Stage::Insert(kind),
            source: Box::new(e),
          });
        }
      },
    }
  }

  info!(
    programs = counts.programs,
    exercises = counts.exercises,
    achievements = counts.achievements,
    fake_activities = counts.fake_activities,
    conflicts = conflicts.len(),
    "reference data seeded"
  );

  if !conflicts.is_empty() {
    return Err(BootstrapError::ConcurrentSeed { kinds: conflicts, seeded: counts });
  }
  Ok(SeedReport::Seeded(counts))
}
