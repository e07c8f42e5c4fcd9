//! SQLite backend for the Ferrovis template store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Opening a store applies the schema in
//! [`schema::SCHEMA`]; seeding is left to [`ferrovis_core::ensure_seeded`].

mod encode;
mod store;

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use store::SqliteStore;
