//! Error types for `ferrovis-core`.

use std::fmt;

use thiserror::Error;

use crate::{bootstrap::SeedCounts, template::TemplateKind};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A defect in catalog data, detected before anything is written.
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("catalog parse error: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("duplicate {kind} entry {key:?}")]
  DuplicateKey { kind: TemplateKind, key: String },

  #[error("{kind} entry {key:?}: {reason}")]
  OutOfRange {
    kind:   TemplateKind,
    key:    String,
    reason: String,
  },
}

impl CatalogError {
  /// The template kind the defect belongs to, if it is tied to one.
  pub fn kind(&self) -> Option<TemplateKind> {
    match self {
      Self::Parse(_) => None,
      Self::DuplicateKey { kind, .. } | Self::OutOfRange { kind, .. } => Some(*kind),
    }
  }
}

/// The step of a bootstrap run that touched the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  /// The idempotency guard (`SELECT COUNT(*)` over programs).
  Guard,
  Insert(TemplateKind),
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Guard => f.write_str("checking seed state"),
      Self::Insert(kind) => write!(f, "inserting the {kind} batch"),
    }
  }
}

/// Failure of [`ensure_seeded`](crate::bootstrap::ensure_seeded).
#[derive(Debug, Error)]
pub enum BootstrapError {
  /// The store could not be reached. Fatal at startup.
  #[error("store unavailable while {stage}: {source}")]
  StoreUnavailable {
    stage:  Stage,
    #[source]
    source: BoxError,
  },

  /// Another process won the race for these batches. Every other batch was
  /// still attempted; the catalog is expected to be complete. `seeded` holds
  /// the rows this caller wrote itself, which may be none.
  #[error("concurrent seeder already populated: {}", join_kinds(.kinds))]
  ConcurrentSeed {
    kinds:  Vec<TemplateKind>,
    seeded: SeedCounts,
  },

  /// A catalog row violated a constraint other than uniqueness. Fatal: the
  /// catalog itself is defective.
  #[error("invalid {kind} catalog entry: {source}")]
  InvalidCatalogEntry {
    kind:   TemplateKind,
    #[source]
    source: BoxError,
  },
}

impl BootstrapError {
  /// Whether startup must abort. Losing a seeding race is not fatal.
  pub fn is_fatal(&self) -> bool { !matches!(self, Self::ConcurrentSeed { .. }) }
}

fn join_kinds(kinds: &[TemplateKind]) -> String {
  kinds.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub type Result<T, E = BootstrapError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn concurrent_seed_is_not_fatal() {
    let err = BootstrapError::ConcurrentSeed {
      kinds:  vec![TemplateKind::Program, TemplateKind::FakeSocialActivity],
      seeded: SeedCounts::default(),
    };
    assert!(!err.is_fatal());
    assert_eq!(
      err.to_string(),
      "concurrent seeder already populated: program, fake_social_activity"
    );
  }

  #[test]
  fn unavailable_names_the_stage() {
    let err = BootstrapError::StoreUnavailable {
      stage:  Stage::Insert(TemplateKind::Achievement),
      source: "connection closed".into(),
    };
    assert!(err.is_fatal());
    assert_eq!(
      err.to_string(),
      "store unavailable while inserting the achievement batch: connection closed"
    );
  }
}
