//! Storage layer
//!
//! The local object store: an embedded SQLite database holding the
//! `bookmarks` and `categories` tables. It is the system of record; the
//! stores in [`crate::stores`] keep in-memory caches in front of it.

pub mod database;
pub mod error;
pub mod schema;

pub use database::{Database, StorageStats};
pub use error::{StorageError, StorageResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
