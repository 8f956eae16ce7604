//! Unified entry point
//!
//! The `Library` owns the object store and the three stores, and wires the
//! one cross-store dependency: deleting a category checks the bookmark
//! store's cache.
//!
//! ## Usage
//!
//! ```ignore
//! let mut library = Library::open()?;
//! library.load();
//!
//! let docs = library.add_category(CategoryFormData::new("Docs"))?;
//! library.add_bookmark(BookmarkFormData::new("Rust", "https://rust-lang.org", docs.id))?;
//!
//! for bookmark in library.bookmarks().by_category(docs.id) {
//!     println!("{} {}", bookmark.order, bookmark.title);
//! }
//! ```

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Bookmark, BookmarkFormData, Category, CategoryFormData, CategoryPatch};
use crate::storage::{Database, StorageStats};
use crate::stores::{BookmarkStore, CategoryStore, SettingsStore, StoreResult};

pub struct Library {
    db: Database,
    bookmarks: BookmarkStore,
    categories: CategoryStore,
    settings: SettingsStore,
    config: Config,
}

impl Library {
    /// Open the library using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the library with a specific configuration
    ///
    /// Caches start empty; call [`Library::load`] to populate them.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let db = Database::open(&config).context("Failed to open database")?;
        Ok(Self::from_parts(db, config))
    }

    /// In-memory library (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().context("Failed to open in-memory database")?;
        Ok(Self::from_parts(db, Config::default()))
    }

    fn from_parts(db: Database, config: Config) -> Self {
        Self {
            db,
            bookmarks: BookmarkStore::new(),
            categories: CategoryStore::new(),
            settings: SettingsStore::with_language(config.language),
            config,
        }
    }

    /// Fetch both caches from storage.
    ///
    /// Failures are recorded on the stores (see their `error()`), not
    /// returned.
    pub fn load(&mut self) {
        self.categories.fetch_all(&self.db);
        self.bookmarks.fetch_all(&self.db);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    // ==================== Bookmark Operations ====================

    pub fn add_bookmark(&mut self, form: BookmarkFormData) -> StoreResult<Bookmark> {
        self.bookmarks.add(&mut self.db, form)
    }

    pub fn update_bookmark(&mut self, id: Uuid, form: BookmarkFormData) -> StoreResult<Bookmark> {
        self.bookmarks.update(&mut self.db, id, form)
    }

    pub fn delete_bookmark(&mut self, id: Uuid) -> StoreResult<()> {
        self.bookmarks.delete(&mut self.db, id)
    }

    pub fn reorder_bookmarks(&mut self, category_id: Uuid, ordered_ids: &[Uuid]) -> StoreResult<()> {
        self.bookmarks.reorder(&mut self.db, category_id, ordered_ids)
    }

    /// Reload one category's bookmarks after out-of-store changes
    pub fn refresh_category(&mut self, category_id: Uuid) -> StoreResult<Vec<Bookmark>> {
        self.bookmarks.fetch_by_category(&self.db, category_id)
    }

    /// Bookmarks carrying a tag, straight from storage
    pub fn bookmarks_with_tag(&self, tag: &str) -> Result<Vec<Bookmark>> {
        self.db
            .bookmarks_with_tag(tag)
            .context("Failed to get bookmarks by tag")
    }

    /// Tags with usage counts
    pub fn tags_with_counts(&self) -> Result<Vec<(String, i64)>> {
        self.db
            .tags_with_counts()
            .context("Failed to get tag counts")
    }

    // ==================== Category Operations ====================

    pub fn add_category(&mut self, form: CategoryFormData) -> StoreResult<Category> {
        self.categories.add(&mut self.db, form)
    }

    pub fn update_category(&mut self, id: Uuid, patch: CategoryPatch) -> StoreResult<Category> {
        self.categories.update(&mut self.db, id, patch)
    }

    /// Delete a category, guarded by the current bookmark cache
    pub fn delete_category(&mut self, id: Uuid) -> StoreResult<()> {
        self.categories
            .delete(&mut self.db, id, self.bookmarks.bookmarks())
    }

    pub fn reorder_categories(&mut self, ordered_ids: &[Uuid]) -> StoreResult<()> {
        self.categories.reorder(&mut self.db, ordered_ids)
    }

    // ==================== Stats ====================

    pub fn storage_stats(&self) -> StorageStats {
        self.db.stats()
    }

    pub fn bookmark_count(&self) -> Result<i64> {
        self.db.bookmark_count().context("Failed to count bookmarks")
    }

    pub fn category_count(&self) -> Result<i64> {
        self.db.category_count().context("Failed to count categories")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{Language, StoreError};
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            language: Language::En,
            log_file: None,
            fetch_metadata: false,
        }
    }

    #[test]
    fn test_open_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let library = Library::open_with_config(config.clone()).unwrap();

        assert!(config.database_path().exists());
        assert!(library.storage_stats().database_exists);
        assert_eq!(library.settings().language(), Language::En);
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let bookmark = {
            let mut library = Library::open_with_config(config.clone()).unwrap();
            let docs = library.add_category(CategoryFormData::new("Docs")).unwrap();
            library
                .add_bookmark(
                    BookmarkFormData::new("Rust", "https://rust-lang.org", docs.id)
                        .with_tags(["lang"]),
                )
                .unwrap()
        };

        let mut library = Library::open_with_config(config).unwrap();
        assert!(library.bookmarks().bookmarks().is_empty());

        library.load();
        assert_eq!(library.categories().categories().len(), 1);
        assert_eq!(library.bookmarks().get(bookmark.id), Some(&bookmark));
        assert_eq!(library.bookmark_count().unwrap(), 1);
        assert_eq!(library.category_count().unwrap(), 1);
    }

    #[test]
    fn test_category_lifecycle_scenario() {
        let mut library = Library::open_in_memory().unwrap();
        let c1 = library.add_category(CategoryFormData::new("c1")).unwrap();
        assert_eq!(c1.order, 1);

        let first = library
            .add_bookmark(BookmarkFormData::new("A", "https://a.com", c1.id))
            .unwrap();
        assert_eq!(first.order, 0);

        let second = library
            .add_bookmark(BookmarkFormData::new("B", "https://b.com", c1.id))
            .unwrap();
        assert_eq!(second.order, 1);

        let err = library.delete_category(c1.id).unwrap_err();
        assert!(matches!(err, StoreError::CategoryHasBookmarks { count: 2, .. }));
        assert!(library.categories().get(c1.id).is_some());

        library.delete_bookmark(first.id).unwrap();
        library.delete_bookmark(second.id).unwrap();

        library.delete_category(c1.id).unwrap();
        assert!(library.categories().get(c1.id).is_none());
        assert_eq!(library.category_count().unwrap(), 0);
    }

    #[test]
    fn test_reorder_and_refresh() {
        let mut library = Library::open_in_memory().unwrap();
        let cat = library.add_category(CategoryFormData::new("c")).unwrap();
        let ids: Vec<Uuid> = ["a", "b", "c"]
            .iter()
            .map(|t| {
                library
                    .add_bookmark(BookmarkFormData::new(*t, format!("https://{}.com", t), cat.id))
                    .unwrap()
                    .id
            })
            .collect();

        library
            .reorder_bookmarks(cat.id, &[ids[2], ids[0], ids[1]])
            .unwrap();

        let titles: Vec<String> = library
            .bookmarks()
            .by_category(cat.id)
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);

        let fresh = library.refresh_category(cat.id).unwrap();
        assert_eq!(fresh[0].id, ids[2]);
    }

    #[test]
    fn test_tags() {
        let mut library = Library::open_in_memory().unwrap();
        let cat = library.add_category(CategoryFormData::new("c")).unwrap();
        library
            .add_bookmark(BookmarkFormData::new("a", "https://a.com", cat.id).with_tags(["web", "rust"]))
            .unwrap();
        library
            .add_bookmark(BookmarkFormData::new("b", "https://b.com", cat.id).with_tags(["rust"]))
            .unwrap();

        assert_eq!(library.bookmarks_with_tag("rust").unwrap().len(), 2);
        let tags = library.tags_with_counts().unwrap();
        assert_eq!(tags[0], ("rust".to_string(), 2));
        assert_eq!(tags[1], ("web".to_string(), 1));
    }

    #[test]
    fn test_update_category_and_settings() {
        let mut library = Library::open_in_memory().unwrap();
        let a = library.add_category(CategoryFormData::new("a")).unwrap();
        let b = library.add_category(CategoryFormData::new("b")).unwrap();

        library
            .update_category(a.id, CategoryPatch::rename("z"))
            .unwrap();
        library.reorder_categories(&[b.id, a.id]).unwrap();

        let names: Vec<String> = library
            .categories()
            .sorted_by_name()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["b", "z"]);

        assert!(library.settings_mut().toggle_dark_mode());
        assert!(library.settings().is_dark());
    }
}
