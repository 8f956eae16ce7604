//! Local object store on SQLite
//!
//! Two record tables keyed by UUID: `bookmarks` and `categories`. Every
//! write runs in its own transaction:
//!
//! - inserts compute the next `order` and write the record in one
//!   `IMMEDIATE` transaction, so two writers cannot pick the same position
//! - puts are append-or-replace by key
//! - deletes are idempotent
//! - batched order updates are all-or-nothing

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Bookmark, BookmarkFormData, Category, CategoryFormData, OrderUpdate};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{init_schema, needs_init};

const BOOKMARK_COLUMNS: &str =
    "id, title, url, description, category_id, sort_order, icon, created_at, updated_at";

const CATEGORY_COLUMNS: &str =
    "id, name, description, icon, sort_order, created_at, updated_at";

/// Handle on the embedded database
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create the database file named by the configuration
    pub fn open(config: &Config) -> StorageResult<Self> {
        let path = config.database_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
        }

        let conn = Connection::open(&path)?;
        debug!("Opened database at {:?}", path);
        Self::prepare(conn, Some(path))
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn, None)
    }

    fn prepare(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        Ok(Self { conn, path })
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Size information about the database file
    pub fn stats(&self) -> StorageStats {
        let database_size = self
            .path
            .as_ref()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len());

        StorageStats {
            path: self.path.clone(),
            database_exists: database_size.is_some(),
            database_size: database_size.unwrap_or(0),
        }
    }

    // ==================== Bookmarks ====================

    /// Every bookmark, ordered by position
    pub fn all_bookmarks(&self) -> StorageResult<Vec<Bookmark>> {
        self.query_bookmarks("", [])
    }

    /// Look up one bookmark by id
    pub fn get_bookmark(&self, id: Uuid) -> StorageResult<Option<Bookmark>> {
        let sql = format!("SELECT {} FROM bookmarks WHERE id = ?", BOOKMARK_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![id.to_string()], read_bookmark_row)
            .optional()?;

        row.map(|r| self.hydrate_bookmark(r)).transpose()
    }

    /// Secondary lookup: bookmarks filed under one category
    pub fn bookmarks_in_category(&self, category_id: Uuid) -> StorageResult<Vec<Bookmark>> {
        self.query_bookmarks("WHERE category_id = ?", params![category_id.to_string()])
    }

    /// Secondary lookup: bookmarks carrying a tag
    pub fn bookmarks_with_tag(&self, tag: &str) -> StorageResult<Vec<Bookmark>> {
        self.query_bookmarks(
            "WHERE id IN (SELECT bookmark_id FROM bookmark_tags WHERE tag = ?)",
            params![tag],
        )
    }

    /// Insert a new bookmark at the end of its category.
    ///
    /// The next position (max + 1, or 0 for an empty category) is read and
    /// the row written inside a single transaction.
    pub fn insert_bookmark(&mut self, form: BookmarkFormData) -> StorageResult<Bookmark> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let max: Option<i64> = tx.query_row(
            "SELECT MAX(sort_order) FROM bookmarks WHERE category_id = ?",
            params![form.category_id.to_string()],
            |row| row.get(0),
        )?;

        let bookmark = Bookmark::from_form(form, max.map_or(0, |m| m + 1));
        write_bookmark(&tx, &bookmark)?;
        tx.commit()?;

        debug!(id = %bookmark.id, order = bookmark.order, "Inserted bookmark");
        Ok(bookmark)
    }

    /// Append-or-replace a bookmark by id
    pub fn put_bookmark(&mut self, bookmark: &Bookmark) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        write_bookmark(&tx, bookmark)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a bookmark. Returns whether a row was removed.
    pub fn delete_bookmark(&mut self, id: Uuid) -> StorageResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", params![id.to_string()])?;
        Ok(removed > 0)
    }

    /// Apply new positions to bookmarks of one category atomically.
    ///
    /// Fails with [`StorageError::OrderTargetMissing`] if any id is unknown
    /// or filed under another category, and with
    /// [`StorageError::DuplicateOrderTarget`] if an id repeats; nothing is
    /// changed in either case.
    pub fn apply_bookmark_orders(
        &mut self,
        category_id: Uuid,
        updates: &[OrderUpdate],
    ) -> StorageResult<()> {
        ensure_distinct(updates)?;
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE bookmarks SET sort_order = ?1 WHERE id = ?2 AND category_id = ?3",
            )?;
            let category_id = category_id.to_string();
            for update in updates {
                let changed =
                    stmt.execute(params![update.order, update.id.to_string(), category_id])?;
                if changed == 0 {
                    return Err(StorageError::OrderTargetMissing { id: update.id });
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Tag names with the number of bookmarks using them
    pub fn tags_with_counts(&self) -> StorageResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT tag, COUNT(*) as count
            FROM bookmark_tags
            GROUP BY tag
            ORDER BY count DESC, tag
            "#,
        )?;

        let tags = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, i64)>, _>>()?;
        Ok(tags)
    }

    /// Get bookmark count
    pub fn bookmark_count(&self) -> StorageResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))
            .map_err(Into::into)
    }

    // ==================== Categories ====================

    /// Every category, ordered by position
    pub fn all_categories(&self) -> StorageResult<Vec<Category>> {
        let sql = format!(
            "SELECT {} FROM categories ORDER BY sort_order, created_at",
            CATEGORY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], read_category_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(CategoryRow::into_category).collect()
    }

    /// Look up one category by id
    pub fn get_category(&self, id: Uuid) -> StorageResult<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE id = ?", CATEGORY_COLUMNS);
        self.conn
            .query_row(&sql, params![id.to_string()], read_category_row)
            .optional()?
            .map(CategoryRow::into_category)
            .transpose()
    }

    /// Insert a new category after all existing ones.
    ///
    /// The next position is max + 1, or 1 for an empty table.
    pub fn insert_category(&mut self, form: CategoryFormData) -> StorageResult<Category> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let max: Option<i64> =
            tx.query_row("SELECT MAX(sort_order) FROM categories", [], |row| row.get(0))?;

        let category = Category::from_form(form, max.unwrap_or(0) + 1);
        write_category(&tx, &category)?;
        tx.commit()?;

        debug!(id = %category.id, order = category.order, "Inserted category");
        Ok(category)
    }

    /// Append-or-replace a category by id
    pub fn put_category(&mut self, category: &Category) -> StorageResult<()> {
        write_category(&self.conn, category)
    }

    /// Delete a category. Returns whether a row was removed.
    pub fn delete_category(&mut self, id: Uuid) -> StorageResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?", params![id.to_string()])?;
        Ok(removed > 0)
    }

    /// Apply new global positions to categories atomically.
    ///
    /// Same failure rules as [`Database::apply_bookmark_orders`].
    pub fn apply_category_orders(&mut self, updates: &[OrderUpdate]) -> StorageResult<()> {
        ensure_distinct(updates)?;
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE categories SET sort_order = ?1 WHERE id = ?2")?;
            for update in updates {
                let changed = stmt.execute(params![update.order, update.id.to_string()])?;
                if changed == 0 {
                    return Err(StorageError::OrderTargetMissing { id: update.id });
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Get category count
    pub fn category_count(&self) -> StorageResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .map_err(Into::into)
    }

    // ==================== Private helpers ====================

    fn query_bookmarks<P: rusqlite::Params>(
        &self,
        filter: &str,
        params: P,
    ) -> StorageResult<Vec<Bookmark>> {
        let sql = format!(
            "SELECT {} FROM bookmarks {} ORDER BY sort_order, created_at",
            BOOKMARK_COLUMNS, filter
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, read_bookmark_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|r| self.hydrate_bookmark(r)).collect()
    }

    /// Attach tags and convert raw columns
    fn hydrate_bookmark(&self, row: BookmarkRow) -> StorageResult<Bookmark> {
        let tags = self.get_tags_for_bookmark(&row.id)?;

        Ok(Bookmark {
            id: parse_id("bookmarks", &row.id)?,
            title: row.title,
            url: row.url,
            description: row.description,
            category_id: parse_id("bookmarks", &row.category_id)?,
            tags,
            order: row.order,
            created_at: parse_millis("bookmarks", row.created_at)?,
            updated_at: parse_millis("bookmarks", row.updated_at)?,
            icon: row.icon,
        })
    }

    fn get_tags_for_bookmark(&self, bookmark_id: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM bookmark_tags WHERE bookmark_id = ? ORDER BY position")?;

        let tags = stmt
            .query_map(params![bookmark_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tags)
    }
}

/// Reject a batch that names the same record twice
fn ensure_distinct(updates: &[OrderUpdate]) -> StorageResult<()> {
    let mut seen = HashSet::with_capacity(updates.len());
    for update in updates {
        if !seen.insert(update.id) {
            return Err(StorageError::DuplicateOrderTarget { id: update.id });
        }
    }
    Ok(())
}

/// Storage statistics
#[derive(Debug, Clone, Default)]
pub struct StorageStats {
    /// Database file, if not in memory
    pub path: Option<PathBuf>,
    /// Whether the database file exists
    pub database_exists: bool,
    /// Size of the database file in bytes
    pub database_size: u64,
}

impl StorageStats {
    /// Human-readable database size
    pub fn size_human(&self) -> String {
        format_bytes(self.database_size)
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

// ==================== Internal structs ====================

struct BookmarkRow {
    id: String,
    title: String,
    url: String,
    description: Option<String>,
    category_id: String,
    order: i64,
    icon: Option<String>,
    created_at: i64,
    updated_at: i64,
}

fn read_bookmark_row(row: &Row) -> rusqlite::Result<BookmarkRow> {
    Ok(BookmarkRow {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
        category_id: row.get(4)?,
        order: row.get(5)?,
        icon: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

struct CategoryRow {
    id: String,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    order: i64,
    created_at: i64,
    updated_at: i64,
}

impl CategoryRow {
    fn into_category(self) -> StorageResult<Category> {
        Ok(Category {
            id: parse_id("categories", &self.id)?,
            name: self.name,
            description: self.description,
            icon: self.icon,
            order: self.order,
            created_at: parse_millis("categories", self.created_at)?,
            updated_at: parse_millis("categories", self.updated_at)?,
        })
    }
}

fn read_category_row(row: &Row) -> rusqlite::Result<CategoryRow> {
    Ok(CategoryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        icon: row.get(3)?,
        order: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn parse_id(table: &'static str, raw: &str) -> StorageResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| StorageError::InvalidRecord {
        table,
        details: format!("invalid UUID '{}': {}", raw, e),
    })
}

fn parse_millis(table: &'static str, millis: i64) -> StorageResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| StorageError::InvalidRecord {
        table,
        details: format!("timestamp out of range: {}", millis),
    })
}

// ==================== Write helpers ====================

/// Upsert the bookmark row and rewrite its tags
fn write_bookmark(conn: &Connection, bookmark: &Bookmark) -> StorageResult<()> {
    let id = bookmark.id.to_string();

    conn.execute(
        r#"
        INSERT INTO bookmarks (id, title, url, description, category_id, sort_order, icon, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            url = excluded.url,
            description = excluded.description,
            category_id = excluded.category_id,
            sort_order = excluded.sort_order,
            icon = excluded.icon,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at
        "#,
        params![
            id,
            bookmark.title,
            bookmark.url,
            bookmark.description,
            bookmark.category_id.to_string(),
            bookmark.order,
            bookmark.icon,
            bookmark.created_at.timestamp_millis(),
            bookmark.updated_at.timestamp_millis(),
        ],
    )?;

    conn.execute("DELETE FROM bookmark_tags WHERE bookmark_id = ?", params![id])?;

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag, position) VALUES (?, ?, ?)",
    )?;
    for (position, tag) in bookmark.tags.iter().enumerate() {
        stmt.execute(params![id, tag, position as i64])?;
    }

    Ok(())
}

fn write_category(conn: &Connection, category: &Category) -> StorageResult<()> {
    conn.execute(
        r#"
        INSERT INTO categories (id, name, description, icon, sort_order, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            icon = excluded.icon,
            sort_order = excluded.sort_order,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at
        "#,
        params![
            category.id.to_string(),
            category.name,
            category.description,
            category.icon,
            category.order,
            category.created_at.timestamp_millis(),
            category.updated_at.timestamp_millis(),
        ],
    )?;
    Ok(())
}
