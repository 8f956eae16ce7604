//! progbox Core Library
//!
//! This crate provides the data layer for progbox, a personal bookmark
//! manager: URLs filed into user-defined categories, tagged, and arranged
//! by hand.
//!
//! # Architecture
//!
//! - **Object store** (SQLite): system of record for bookmarks and categories
//! - **Stores**: in-memory caches that mediate every read and write
//!
//! # Quick Start
//!
//! ```text
//! let mut library = Library::open()?;
//! library.load();
//!
//! let tools = library.add_category(CategoryFormData::new("Tools"))?;
//! library.add_bookmark(BookmarkFormData::new("crates.io", "https://crates.io", tools.id))?;
//! ```
//!
//! # Modules
//!
//! - `library`: Unified entry point
//! - `stores`: Bookmark, category and settings stores
//! - `models`: Records and form payloads
//! - `storage`: SQLite object store
//! - `ordering`: Sorting, grouping and move helpers
//! - `url_utils`: URL validation and favicon lookup
//! - `config`: Application configuration

pub mod config;
pub mod library;
pub mod models;
pub mod ordering;
pub mod storage;
pub mod stores;
pub mod url_utils;

pub use config::Config;
pub use library::Library;
pub use models::{Bookmark, BookmarkFormData, Category, CategoryFormData, CategoryPatch};
pub use storage::{Database, StorageError, StorageStats};
pub use stores::{BookmarkStore, CategoryStore, Language, SettingsStore, StoreError};
