//! Errors surfaced by the bookmark and category stores

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Delete guard: the category is still referenced
    #[error("Category {id} still has {count} bookmark(s) and cannot be deleted")]
    CategoryHasBookmarks { id: Uuid, count: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type StoreResult<T> = Result<T, StoreError>;
