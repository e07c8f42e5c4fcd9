//! [`SqliteStore`], the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use chrono::Utc;
use ferrovis_core::{
  store::{Batch, CatalogStore},
  template::{Achievement, Exercise, FakeSocialActivity, Program, TemplateKind},
};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Result,
  encode::{RawAchievement, RawExercise, RawFakeActivity, RawProgram, encode_batch},
  schema::{SCHEMA, TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Ferrovis template store backed by a single SQLite file.
///
/// Clones share one reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.migrate().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.migrate().await?;
    Ok(store)
  }

  /// Apply [`SCHEMA`]. Safe to run against an already-migrated database.
  pub async fn migrate(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!("schema applied");
    Ok(())
  }

  /// Tables from [`TABLES`] that do not exist in the database.
  pub async fn missing_tables(&self) -> Result<Vec<&'static str>> {
    let present: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await?;

    Ok(
      TABLES
        .into_iter()
        .filter(|t| !present.iter().any(|p| p == t))
        .collect(),
    )
  }

  /// Close the underlying connection. Other clones of this store fail with
  /// an unavailable error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = crate::Error;

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn count(&self, kind: TemplateKind) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL", kind.table());

    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;

    Ok(n as u64)
  }

  async fn insert_batch<'a>(&'a self, batch: Batch<'a>) -> Result<usize> {
    let encoded = encode_batch(&batch, Utc::now())?;
    let kind = encoded.kind;

    let written = self
      .conn
      .call(move |conn| {
        // Take the write lock up front so a second connection waits on the
        // busy timeout instead of failing with a stale snapshot.
        let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        {
          let mut stmt = tx.prepare(encoded.sql)?;
          for row in &encoded.rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
          }
        }
        tx.commit()?;
        Ok(encoded.rows.len())
      })
      .await?;

    debug!(%kind, rows = written, "batch committed");
    Ok(written)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_programs(&self) -> Result<Vec<Program>> {
    let raws: Vec<RawProgram> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM programs WHERE deleted_at IS NULL ORDER BY id",
          RawProgram::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawProgram::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProgram::into_program).collect()
  }

  async fn get_program(&self, id: i64) -> Result<Option<Program>> {
    let raw: Option<RawProgram> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM programs WHERE id = ?1 AND deleted_at IS NULL",
                RawProgram::COLUMNS
              ),
              rusqlite::params![id],
              RawProgram::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProgram::into_program).transpose()
  }

  async fn list_exercises(&self) -> Result<Vec<Exercise>> {
    let raws: Vec<RawExercise> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM exercises WHERE deleted_at IS NULL ORDER BY id",
          RawExercise::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawExercise::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExercise::into_exercise).collect()
  }

  async fn list_achievements(&self) -> Result<Vec<Achievement>> {
    let raws: Vec<RawAchievement> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM achievements WHERE deleted_at IS NULL ORDER BY id",
          RawAchievement::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawAchievement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAchievement::into_achievement).collect()
  }

  async fn list_fake_activities(&self) -> Result<Vec<FakeSocialActivity>> {
    let raws: Vec<RawFakeActivity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM fake_social_activities WHERE deleted_at IS NULL
           ORDER BY timestamp DESC, id",
          RawFakeActivity::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawFakeActivity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFakeActivity::into_activity).collect()
  }
}
