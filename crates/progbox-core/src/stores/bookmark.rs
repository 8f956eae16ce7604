//! Bookmark store
//!
//! Keeps an in-memory cache of bookmarks in front of the object store.
//! Every successful mutating call leaves the cache consistent with storage;
//! changes made behind the store's back need [`BookmarkStore::fetch_all`] or
//! [`BookmarkStore::fetch_by_category`].
//!
//! Failure handling follows two styles. Fetching all records never returns
//! an error: it records a message in [`BookmarkStore::error`] and logs.
//! Mutations log and return the error to the caller; delete and reorder also
//! record the message.

use tracing::{debug, error};
use uuid::Uuid;

use crate::models::{Bookmark, BookmarkFormData, OrderUpdate};
use crate::ordering::{sort_by, SortDirection};
use crate::storage::Database;
use crate::stores::error::{StoreError, StoreResult};

const FETCH_FAILED: &str = "Failed to fetch bookmarks";
const DELETE_FAILED: &str = "Failed to delete bookmark";
const REORDER_FAILED: &str = "Failed to update bookmark order";

#[derive(Debug, Default)]
pub struct BookmarkStore {
    bookmarks: Vec<Bookmark>,
    is_loading: bool,
    error: Option<String>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached bookmarks, in cache order
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Cached bookmark by id
    pub fn get(&self, id: Uuid) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last recorded failure
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Replace the cache with the whole bookmark table.
    ///
    /// On failure the previous cache is kept and [`Self::error`] is set.
    pub fn fetch_all(&mut self, db: &Database) {
        self.is_loading = true;
        self.error = None;

        match db.all_bookmarks() {
            Ok(bookmarks) => {
                debug!(count = bookmarks.len(), "Fetched bookmarks");
                self.bookmarks = bookmarks;
            }
            Err(e) => {
                error!("{}: {}", FETCH_FAILED, e);
                self.error = Some(FETCH_FAILED.to_string());
            }
        }

        self.is_loading = false;
    }

    /// Cached bookmarks of one category, ascending by `order`
    pub fn by_category(&self, category_id: Uuid) -> Vec<Bookmark> {
        let in_category: Vec<Bookmark> = self
            .bookmarks
            .iter()
            .filter(|b| b.category_id == category_id)
            .cloned()
            .collect();
        sort_by(&in_category, |b| b.order, SortDirection::Ascending)
    }

    /// Number of cached bookmarks referencing a category
    pub fn count_in_category(&self, category_id: Uuid) -> usize {
        self.bookmarks
            .iter()
            .filter(|b| b.category_id == category_id)
            .count()
    }

    /// Create a bookmark at the end of its category and cache it
    pub fn add(&mut self, db: &mut Database, form: BookmarkFormData) -> StoreResult<Bookmark> {
        let bookmark = db.insert_bookmark(form).map_err(|e| {
            error!("Failed to add bookmark: {}", e);
            StoreError::from(e)
        })?;

        self.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    /// Replace a bookmark's editable fields.
    ///
    /// `order` and `created_at` come from the stored record, never from the
    /// form. The cache entry is replaced, or inserted if it was not cached.
    pub fn update(
        &mut self,
        db: &mut Database,
        id: Uuid,
        form: BookmarkFormData,
    ) -> StoreResult<Bookmark> {
        let result = Self::write_update(db, id, form);
        let bookmark = result.map_err(|e| {
            error!("Failed to update bookmark {}: {}", id, e);
            e
        })?;

        match self.bookmarks.iter_mut().find(|b| b.id == id) {
            Some(cached) => *cached = bookmark.clone(),
            None => self.bookmarks.push(bookmark.clone()),
        }
        Ok(bookmark)
    }

    fn write_update(db: &mut Database, id: Uuid, form: BookmarkFormData) -> StoreResult<Bookmark> {
        let mut bookmark = db
            .get_bookmark(id)?
            .ok_or(StoreError::BookmarkNotFound(id))?;
        bookmark.apply_form(form);
        db.put_bookmark(&bookmark)?;
        Ok(bookmark)
    }

    /// Delete a bookmark. Unknown ids succeed and leave the cache as is.
    pub fn delete(&mut self, db: &mut Database, id: Uuid) -> StoreResult<()> {
        if let Err(e) = db.delete_bookmark(id) {
            error!("{} {}: {}", DELETE_FAILED, id, e);
            self.error = Some(DELETE_FAILED.to_string());
            return Err(e.into());
        }

        self.bookmarks.retain(|b| b.id != id);
        Ok(())
    }

    /// Make `ordered_ids` the new sequence of a category: each id gets its
    /// index as `order`. All positions change together or not at all.
    pub fn reorder(
        &mut self,
        db: &mut Database,
        category_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> StoreResult<()> {
        let updates = OrderUpdate::from_sequence(ordered_ids);

        if let Err(e) = db.apply_bookmark_orders(category_id, &updates) {
            error!("{} in category {}: {}", REORDER_FAILED, category_id, e);
            self.error = Some(REORDER_FAILED.to_string());
            return Err(e.into());
        }

        for bookmark in self
            .bookmarks
            .iter_mut()
            .filter(|b| b.category_id == category_id)
        {
            if let Some(update) = updates.iter().find(|u| u.id == bookmark.id) {
                bookmark.order = update.order;
            }
        }
        Ok(())
    }

    /// Reload one category from storage and splice it into the cache.
    ///
    /// Returns the fresh records of that category.
    pub fn fetch_by_category(
        &mut self,
        db: &Database,
        category_id: Uuid,
    ) -> StoreResult<Vec<Bookmark>> {
        let fresh = db.bookmarks_in_category(category_id).map_err(|e| {
            error!("Failed to fetch bookmarks of category {}: {}", category_id, e);
            StoreError::from(e)
        })?;

        self.bookmarks.retain(|b| b.category_id != category_id);
        self.bookmarks.extend(fresh.iter().cloned());
        self.bookmarks = sort_by(&self.bookmarks, |b| b.order, SortDirection::Ascending);
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    fn setup() -> (Database, BookmarkStore) {
        (Database::open_in_memory().unwrap(), BookmarkStore::new())
    }

    fn form(category_id: Uuid, title: &str) -> BookmarkFormData {
        BookmarkFormData::new(title, format!("https://{}.com", title), category_id)
    }

    fn orders(store: &BookmarkStore, category_id: Uuid) -> Vec<(String, i64)> {
        store
            .by_category(category_id)
            .into_iter()
            .map(|b| (b.title, b.order))
            .collect()
    }

    #[test]
    fn test_add_into_empty_category_starts_at_zero() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();

        let first = store.add(&mut db, form(cat, "a")).unwrap();
        let second = store.add(&mut db, form(cat, "b")).unwrap();

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert_eq!(store.bookmarks().len(), 2);
    }

    #[test]
    fn test_add_after_max_order_five() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();

        let mut existing = store.add(&mut db, form(cat, "a")).unwrap();
        existing.order = 5;
        db.put_bookmark(&existing).unwrap();

        let added = store.add(&mut db, form(cat, "b")).unwrap();
        assert_eq!(added.order, 6);
    }

    #[test]
    fn test_add_failure_leaves_cache_untouched() {
        let (mut db, mut store) = setup();
        db.connection().execute_batch("DROP TABLE bookmark_tags; DROP TABLE bookmarks;").unwrap();

        assert!(store.add(&mut db, form(Uuid::new_v4(), "a")).is_err());
        assert!(store.bookmarks().is_empty());
    }

    #[test]
    fn test_round_trip_add_then_fetch_all() {
        let (mut db, mut store) = setup();
        let added = store
            .add(
                &mut db,
                form(Uuid::new_v4(), "a")
                    .with_tags(["one", "two"])
                    .with_description("desc"),
            )
            .unwrap();

        let mut fresh = BookmarkStore::new();
        fresh.fetch_all(&db);

        assert_eq!(fresh.get(added.id), Some(&added));
        assert!(!fresh.is_loading());
        assert!(fresh.error().is_none());
    }

    #[test]
    fn test_fetch_all_failure_keeps_previous_cache() {
        let (mut db, mut store) = setup();
        store.add(&mut db, form(Uuid::new_v4(), "a")).unwrap();

        db.connection().execute_batch("DROP TABLE bookmark_tags; DROP TABLE bookmarks;").unwrap();
        store.fetch_all(&db);

        assert_eq!(store.error(), Some(FETCH_FAILED));
        assert_eq!(store.bookmarks().len(), 1);
        assert!(!store.is_loading());

        store.clear_error();
        assert!(store.error().is_none());
    }

    #[test]
    fn test_by_category_sorted_by_order() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();
        let other = Uuid::new_v4();
        let a = store.add(&mut db, form(cat, "a")).unwrap();
        store.add(&mut db, form(other, "x")).unwrap();
        let b = store.add(&mut db, form(cat, "b")).unwrap();

        store.reorder(&mut db, cat, &[b.id, a.id]).unwrap();

        assert_eq!(
            orders(&store, cat),
            vec![("b".to_string(), 0), ("a".to_string(), 1)]
        );
        assert_eq!(store.count_in_category(other), 1);
    }

    #[test]
    fn test_update_preserves_order_and_created_at() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();
        store.add(&mut db, form(cat, "first")).unwrap();
        let original = store.add(&mut db, form(cat, "second")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let updated = store
            .update(&mut db, original.id, form(cat, "renamed").with_tags(["new"]))
            .unwrap();

        assert_eq!(updated.order, original.order);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);

        let stored = db.get_bookmark(original.id).unwrap().unwrap();
        assert_eq!(stored, updated);

        // Cache reflects the update without a refetch
        assert_eq!(store.get(original.id), Some(&updated));
    }

    #[test]
    fn test_update_missing_bookmark_fails() {
        let (mut db, mut store) = setup();
        let id = Uuid::new_v4();

        let err = store
            .update(&mut db, id, form(Uuid::new_v4(), "a"))
            .unwrap_err();
        assert!(matches!(err, StoreError::BookmarkNotFound(missing) if missing == id));
        assert!(store.bookmarks().is_empty());
    }

    #[test]
    fn test_delete_removes_from_storage_and_cache() {
        let (mut db, mut store) = setup();
        let bookmark = store.add(&mut db, form(Uuid::new_v4(), "a")).unwrap();

        store.delete(&mut db, bookmark.id).unwrap();

        assert!(store.get(bookmark.id).is_none());
        assert!(db.get_bookmark(bookmark.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let (mut db, mut store) = setup();
        store.add(&mut db, form(Uuid::new_v4(), "a")).unwrap();

        store.delete(&mut db, Uuid::new_v4()).unwrap();
        assert_eq!(store.bookmarks().len(), 1);
        assert!(store.error().is_none());
    }

    #[test]
    fn test_delete_failure_sets_error() {
        let (mut db, mut store) = setup();
        let bookmark = store.add(&mut db, form(Uuid::new_v4(), "a")).unwrap();
        db.connection().execute_batch("DROP TABLE bookmark_tags; DROP TABLE bookmarks;").unwrap();

        assert!(store.delete(&mut db, bookmark.id).is_err());
        assert_eq!(store.error(), Some(DELETE_FAILED));
        assert!(store.get(bookmark.id).is_some());
    }

    #[test]
    fn test_reorder_permutation() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();
        let a = store.add(&mut db, form(cat, "a")).unwrap();
        let b = store.add(&mut db, form(cat, "b")).unwrap();
        let c = store.add(&mut db, form(cat, "c")).unwrap();

        store.reorder(&mut db, cat, &[c.id, a.id, b.id]).unwrap();

        for (id, expected) in [(c.id, 0), (a.id, 1), (b.id, 2)] {
            assert_eq!(store.get(id).unwrap().order, expected);
            assert_eq!(db.get_bookmark(id).unwrap().unwrap().order, expected);
        }
    }

    #[test]
    fn test_reorder_failure_changes_nothing() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();
        let a = store.add(&mut db, form(cat, "a")).unwrap();
        let b = store.add(&mut db, form(cat, "b")).unwrap();

        let result = store.reorder(&mut db, cat, &[b.id, Uuid::new_v4(), a.id]);

        assert!(matches!(result, Err(StoreError::Storage(_))));
        assert_eq!(store.error(), Some(REORDER_FAILED));
        assert_eq!(
            orders(&store, cat),
            vec![("a".to_string(), 0), ("b".to_string(), 1)]
        );
        assert_eq!(db.get_bookmark(b.id).unwrap().unwrap().order, 1);
    }

    #[test]
    fn test_reorder_rejects_repeated_id() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();
        let a = store.add(&mut db, form(cat, "a")).unwrap();
        let b = store.add(&mut db, form(cat, "b")).unwrap();

        let err = store.reorder(&mut db, cat, &[a.id, b.id, a.id]).unwrap_err();

        assert!(matches!(
            err,
            StoreError::Storage(StorageError::DuplicateOrderTarget { id }) if id == a.id
        ));
        assert_eq!(store.error(), Some(REORDER_FAILED));
        for bookmark in [&a, &b] {
            let stored = db.get_bookmark(bookmark.id).unwrap().unwrap().order;
            assert_eq!(store.get(bookmark.id).unwrap().order, stored);
            assert_eq!(stored, bookmark.order);
        }
    }

    #[test]
    fn test_fetch_by_category_splices_fresh_records() {
        let (mut db, mut store) = setup();
        let cat = Uuid::new_v4();
        let other = Uuid::new_v4();
        store.add(&mut db, form(other, "x")).unwrap();
        let a = store.add(&mut db, form(cat, "a")).unwrap();

        // Out-of-store changes: a new row and an edited one
        let outside = db.insert_bookmark(form(cat, "b")).unwrap();
        let mut edited = a.clone();
        edited.title = "edited".to_string();
        db.put_bookmark(&edited).unwrap();

        let fresh = store.fetch_by_category(&db, cat).unwrap();
        assert_eq!(fresh.len(), 2);

        assert_eq!(store.bookmarks().len(), 3);
        assert_eq!(store.get(a.id).unwrap().title, "edited");
        assert!(store.get(outside.id).is_some());

        // Whole cache is sorted by order
        let all_orders: Vec<i64> = store.bookmarks().iter().map(|b| b.order).collect();
        let mut sorted = all_orders.clone();
        sorted.sort();
        assert_eq!(all_orders, sorted);
    }
}
