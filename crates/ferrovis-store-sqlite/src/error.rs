//! Error type for `ferrovis-store-sqlite`.

use ferrovis_core::store::{ClassifyFailure, StoreFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored value could not be turned back into a domain type.
  #[error("decode error in {column}: {message}")]
  Decode {
    column:  &'static str,
    message: String,
  },
}

impl ClassifyFailure for Error {
  fn failure(&self) -> StoreFailure {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)))
        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        match e.extended_code {
          rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            StoreFailure::UniqueViolation
          }
          _ => StoreFailure::ConstraintViolation,
        }
      }
      // The data does not fit the schema; retrying elsewhere will not help.
      Error::Json(_) | Error::Decode { .. } => StoreFailure::ConstraintViolation,
      Error::Database(_) => StoreFailure::Unavailable,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
