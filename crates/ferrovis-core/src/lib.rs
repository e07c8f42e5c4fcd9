//! Core types and trait definitions for the Ferrovis fitness backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the reference-data catalog, the [`store::CatalogStore`] abstraction and the
//! bootstrapper that seeds a store from the catalog exactly once.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod bootstrap;
pub mod catalog;
pub mod error;
pub mod store;
pub mod template;

pub use bootstrap::{SeedCounts, SeedReport, ensure_seeded, ensure_seeded_at};
pub use catalog::Catalog;
pub use error::{BootstrapError, CatalogError};
