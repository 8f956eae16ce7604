//! Command handlers

pub mod bookmark;
pub mod category;
pub mod config;
pub mod status;
pub mod tag;

use anyhow::{bail, Result};
use uuid::Uuid;

use progbox_core::{Bookmark, Category, Library};

/// Resolve a bookmark ID (supports full UUID or prefix)
pub fn parse_bookmark_id(id: &str, library: &Library) -> Result<Uuid> {
    let bookmarks = library.bookmarks().bookmarks();
    let matches = match_prefix(id, bookmarks, |b| b.id);

    match matches.len() {
        0 => bail!("No bookmark found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple bookmarks match '{}':", id);
            for bookmark in &matches {
                eprintln!("  {} - {}", bookmark.id, bookmark.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Resolve a category by exact name, full UUID or ID prefix
pub fn resolve_category(key: &str, library: &Library) -> Result<Uuid> {
    if let Some(category) = library.categories().find_by_name(key) {
        return Ok(category.id);
    }

    let categories = library.categories().categories();
    let matches = match_prefix(key, categories, |c| c.id);

    match matches.len() {
        0 => bail!(
            "No category found matching: {}\nCreate it with: progbox category add \"{}\"",
            key,
            key
        ),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple categories match '{}':", key);
            for category in &matches {
                eprintln!("  {} - {}", category.id, category.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Look up a cached bookmark, failing with a readable message
pub fn require_bookmark(library: &Library, id: Uuid) -> Result<Bookmark> {
    library
        .bookmarks()
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))
}

/// Look up a cached category, failing with a readable message
pub fn require_category(library: &Library, id: Uuid) -> Result<Category> {
    library
        .categories()
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", id))
}

/// Records whose id equals `key`, or starts with it
fn match_prefix<'a, T, F>(key: &str, items: &'a [T], id_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Uuid,
{
    if let Ok(uuid) = Uuid::parse_str(key) {
        return items.iter().filter(|item| id_of(item) == uuid).collect();
    }

    let key = key.to_lowercase();
    if key.is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|item| id_of(item).to_string().starts_with(&key))
        .collect()
}

/// Convert a 1-based position from the command line to an index
pub fn position_to_index(position: usize) -> Result<usize> {
    if position == 0 {
        bail!("Positions start at 1");
    }
    Ok(position - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use progbox_core::{BookmarkFormData, CategoryFormData};

    fn library_with_data() -> (Library, Category, Bookmark) {
        let mut library = Library::open_in_memory().unwrap();
        let category = library.add_category(CategoryFormData::new("Docs")).unwrap();
        let bookmark = library
            .add_bookmark(BookmarkFormData::new("Rust", "https://rust-lang.org", category.id))
            .unwrap();
        (library, category, bookmark)
    }

    #[test]
    fn test_parse_bookmark_id_full_and_prefix() {
        let (library, _, bookmark) = library_with_data();

        let full = bookmark.id.to_string();
        assert_eq!(parse_bookmark_id(&full, &library).unwrap(), bookmark.id);
        assert_eq!(parse_bookmark_id(&full[..8], &library).unwrap(), bookmark.id);
        assert!(parse_bookmark_id("zzzz", &library).is_err());
        assert!(parse_bookmark_id("", &library).is_err());
    }

    #[test]
    fn test_parse_bookmark_id_unknown_uuid() {
        let (library, _, _) = library_with_data();
        let other = Uuid::new_v4().to_string();
        assert!(parse_bookmark_id(&other, &library).is_err());
    }

    #[test]
    fn test_resolve_category_by_name_and_prefix() {
        let (library, category, _) = library_with_data();

        assert_eq!(resolve_category("Docs", &library).unwrap(), category.id);
        let prefix = category.id.to_string()[..6].to_string();
        assert_eq!(resolve_category(&prefix, &library).unwrap(), category.id);
        assert!(resolve_category("Missing", &library).is_err());
    }

    #[test]
    fn test_position_to_index() {
        assert_eq!(position_to_index(1).unwrap(), 0);
        assert_eq!(position_to_index(4).unwrap(), 3);
        assert!(position_to_index(0).is_err());
    }
}
