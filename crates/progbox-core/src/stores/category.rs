//! Category store
//!
//! Same cache-in-front-of-storage shape as the bookmark store. Categories
//! carry two independent orderings: the persisted `order` (manual
//! arrangement) and a derived alphabetical view from
//! [`CategoryStore::sorted_by_name`].
//!
//! A category cannot be deleted while bookmarks reference it. The check runs
//! against a bookmark snapshot passed in by the caller, so its accuracy is
//! exactly that of the snapshot.

use std::cmp::Ordering;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::models::{Bookmark, Category, CategoryFormData, CategoryPatch, OrderUpdate};
use crate::ordering::{sort_by, SortDirection};
use crate::storage::Database;
use crate::stores::error::{StoreError, StoreResult};

const FETCH_FAILED: &str = "Failed to fetch categories";
const ADD_FAILED: &str = "Failed to add category";
const UPDATE_FAILED: &str = "Failed to update category";
const DELETE_FAILED: &str = "Failed to delete category";
const REORDER_FAILED: &str = "Failed to update category order";

#[derive(Debug, Default)]
pub struct CategoryStore {
    categories: Vec<Category>,
    is_loading: bool,
    error: Option<String>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached categories, ascending by `order` after a fetch
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// First cached category with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Replace the cache with all categories sorted by `order`.
    ///
    /// On failure the previous cache is kept and [`Self::error`] is set.
    pub fn fetch_all(&mut self, db: &Database) {
        self.is_loading = true;
        self.error = None;

        match db.all_categories() {
            Ok(categories) => {
                debug!(count = categories.len(), "Fetched categories");
                self.categories = sort_by(&categories, |c| c.order, SortDirection::Ascending);
            }
            Err(e) => {
                error!("{}: {}", FETCH_FAILED, e);
                self.error = Some(FETCH_FAILED.to_string());
            }
        }

        self.is_loading = false;
    }

    /// Alphabetical view for browsing; does not affect `order`
    pub fn sorted_by_name(&self) -> Vec<Category> {
        let mut sorted = self.categories.clone();
        sorted.sort_by(|a, b| compare_names(&a.name, &b.name));
        sorted
    }

    /// Create a category after all existing ones and cache it
    pub fn add(&mut self, db: &mut Database, form: CategoryFormData) -> StoreResult<Category> {
        match db.insert_category(form) {
            Ok(category) => {
                self.categories.push(category.clone());
                Ok(category)
            }
            Err(e) => Err(self.fail(ADD_FAILED, e.into())),
        }
    }

    /// Merge `patch` into a cached category and persist the result.
    ///
    /// Only the cache is consulted for existence.
    pub fn update(
        &mut self,
        db: &mut Database,
        id: Uuid,
        patch: CategoryPatch,
    ) -> StoreResult<Category> {
        let Some(index) = self.categories.iter().position(|c| c.id == id) else {
            return Err(self.fail(UPDATE_FAILED, StoreError::CategoryNotFound(id)));
        };

        let mut merged = self.categories[index].clone();
        merged.merge(patch);

        if let Err(e) = db.put_category(&merged) {
            return Err(self.fail(UPDATE_FAILED, e.into()));
        }

        self.categories[index] = merged.clone();
        Ok(merged)
    }

    /// Delete a category unless a bookmark in `bookmarks` references it.
    ///
    /// A rejected delete touches neither storage nor the cache.
    pub fn delete(&mut self, db: &mut Database, id: Uuid, bookmarks: &[Bookmark]) -> StoreResult<()> {
        let count = bookmarks.iter().filter(|b| b.category_id == id).count();
        if count > 0 {
            let err = StoreError::CategoryHasBookmarks { id, count };
            warn!("{}", err);
            self.error = Some(err.to_string());
            return Err(err);
        }

        if let Err(e) = db.delete_category(id) {
            return Err(self.fail(DELETE_FAILED, e.into()));
        }

        self.categories.retain(|c| c.id != id);
        Ok(())
    }

    /// Make `ordered_ids` the new global sequence; all-or-nothing
    pub fn reorder(&mut self, db: &mut Database, ordered_ids: &[Uuid]) -> StoreResult<()> {
        let updates = OrderUpdate::from_sequence(ordered_ids);

        if let Err(e) = db.apply_category_orders(&updates) {
            return Err(self.fail(REORDER_FAILED, e.into()));
        }

        for category in &mut self.categories {
            if let Some(update) = updates.iter().find(|u| u.id == category.id) {
                category.order = update.order;
            }
        }
        self.categories.sort_by_key(|c| c.order);
        Ok(())
    }

    /// Record and log a failure, handing the error back for propagation
    fn fail(&mut self, message: &str, err: StoreError) -> StoreError {
        error!("{}: {}", message, err);
        self.error = Some(match &err {
            StoreError::CategoryNotFound(_) => err.to_string(),
            _ => message.to_string(),
        });
        err
    }
}

/// Case-insensitive name comparison with an exact tie-break, so that the
/// order is total and stable across runs.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
