//! Stateful stores over the object store
//!
//! Each store owns an in-memory cache used for synchronous reads and
//! routes writes through [`crate::storage::Database`].

pub mod bookmark;
pub mod category;
pub mod error;
pub mod settings;

pub use bookmark::BookmarkStore;
pub use category::CategoryStore;
pub use error::{StoreError, StoreResult};
pub use settings::{Language, SettingsStore};
