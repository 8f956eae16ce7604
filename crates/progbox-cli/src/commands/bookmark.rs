//! Bookmark command handlers

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use progbox_core::ordering::move_item;
use progbox_core::url_utils::{favicon_url, is_valid_url};
use progbox_core::{Bookmark, BookmarkFormData, Library};

use super::{parse_bookmark_id, position_to_index, require_bookmark, resolve_category};
use crate::metadata::fetch_metadata;
use crate::output::{short_id, Output};
use crate::prompt::{confirm, parse_tags, prompt_clearable, prompt_optional, prompt_with_default};

/// Arguments for `bookmark add`
pub struct AddArgs {
    pub url: String,
    pub category: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub icon: Option<String>,
    pub no_fetch: bool,
}

/// Field overrides for `bookmark edit`; all empty means interactive
#[derive(Default)]
pub struct EditArgs {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub icon: Option<String>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.icon.is_none()
    }
}

/// Create a new bookmark
pub async fn add(library: &mut Library, args: AddArgs, output: &Output) -> Result<()> {
    if !is_valid_url(&args.url) {
        bail!("Invalid URL: {}", args.url);
    }
    let category_id = resolve_category(&args.category, library)?;

    let mut description = args.description;
    let title = match args.title {
        Some(title) => title,
        None if library.config().fetch_metadata && !args.no_fetch => {
            let metadata = fetch_metadata(&args.url).await;
            if description.is_none() {
                description = metadata.description;
            }
            metadata.title.unwrap_or_else(|| args.url.clone())
        }
        None => args.url.clone(),
    };

    let mut form = BookmarkFormData::new(title, args.url.as_str(), category_id).with_tags(args.tags);
    form.description = description;
    form.icon = Some(args.icon.unwrap_or_else(|| favicon_url(&args.url)));

    let bookmark = library
        .add_bookmark(form)
        .context("Failed to create bookmark")?;

    output.success(&format!("Created bookmark: {}", bookmark.id));
    output.print_bookmark(&bookmark, library.categories().get(bookmark.category_id));

    Ok(())
}

/// List bookmarks, optionally filtered by category or tag
pub fn list(
    library: &Library,
    category: Option<String>,
    tag: Option<String>,
    output: &Output,
) -> Result<()> {
    match (category, tag) {
        (Some(key), tag) => {
            let category_id = resolve_category(&key, library)?;
            let mut bookmarks = library.bookmarks().by_category(category_id);
            if let Some(ref t) = tag {
                bookmarks.retain(|b| b.has_tag(t));
            }
            output.print_bookmarks(&bookmarks);
        }
        (None, Some(t)) => {
            let bookmarks = library.bookmarks_with_tag(&t)?;
            output.print_grouped(library.categories().categories(), &bookmarks);
        }
        (None, None) => {
            output.print_grouped(
                library.categories().categories(),
                library.bookmarks().bookmarks(),
            );
        }
    }
    Ok(())
}

/// Show a single bookmark
pub fn show(library: &Library, id: String, output: &Output) -> Result<()> {
    let uuid = parse_bookmark_id(&id, library)?;
    let bookmark = require_bookmark(library, uuid)?;

    output.print_bookmark(&bookmark, library.categories().get(bookmark.category_id));
    Ok(())
}

/// Edit a bookmark, from flags or interactively
pub fn edit(library: &mut Library, id: String, args: EditArgs, output: &Output) -> Result<()> {
    let uuid = parse_bookmark_id(&id, library)?;
    let bookmark = require_bookmark(library, uuid)?;
    let mut form = bookmark.to_form();

    if args.is_empty() {
        println!("Editing bookmark: {}", bookmark.id);
        println!("Press Enter to keep current value, or type new value.\n");

        if let Some(title) = prompt_with_default("Title", &form.title)? {
            form.title = title;
        }
        if let Some(url) = prompt_with_default("URL", &form.url)? {
            form.url = url;
        }
        let current_desc = form.description.clone().unwrap_or_default();
        if let Some(desc) = prompt_clearable("Description", &current_desc)? {
            form.description = Some(desc);
        }
        let current_icon = form.icon.clone().unwrap_or_default();
        if let Some(icon) = prompt_clearable("Icon", &current_icon)? {
            form.icon = Some(icon);
        }
        let current_category = library
            .categories()
            .get(form.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        if let Some(key) = prompt_with_default("Category", &current_category)? {
            form.category_id = resolve_category(&key, library)?;
        }

        let current_tags = form.tags.join(", ");
        println!(
            "Current tags: {}",
            if current_tags.is_empty() {
                "(none)"
            } else {
                &current_tags
            }
        );
        if let Some(tags) = prompt_optional("New tags (comma-separated)")? {
            form.tags = parse_tags(&tags);
        }
    } else {
        if let Some(title) = args.title {
            form.title = title;
        }
        if let Some(url) = args.url {
            form.url = url;
        }
        if let Some(desc) = args.description {
            form.description = Some(desc);
        }
        if let Some(key) = args.category {
            form.category_id = resolve_category(&key, library)?;
        }
        if let Some(tags) = args.tags {
            form.tags = tags;
        }
        if let Some(icon) = args.icon {
            form.icon = Some(icon);
        }
    }

    if !is_valid_url(&form.url) {
        bail!("Invalid URL: {}", form.url);
    }

    let updated = library
        .update_bookmark(uuid, form)
        .context("Failed to update bookmark")?;

    let updated = if updated.category_id != bookmark.category_id {
        append_to_category(library, uuid, updated.category_id)?
    } else {
        updated
    };

    output.success("Bookmark updated");
    output.print_bookmark(&updated, library.categories().get(updated.category_id));

    Ok(())
}

/// Renumber a category so that `id` sits last, after the others in their
/// current order. A bookmark moved in keeps its old `order` until then.
fn append_to_category(library: &mut Library, id: Uuid, category_id: Uuid) -> Result<Bookmark> {
    let mut ids: Vec<Uuid> = library
        .bookmarks()
        .by_category(category_id)
        .into_iter()
        .map(|b| b.id)
        .filter(|candidate| *candidate != id)
        .collect();
    ids.push(id);

    library
        .reorder_bookmarks(category_id, &ids)
        .context("Failed to renumber target category")?;
    require_bookmark(library, id)
}

/// Delete a bookmark
pub fn delete(library: &mut Library, id: String, output: &Output) -> Result<()> {
    let uuid = parse_bookmark_id(&id, library)?;
    let bookmark = require_bookmark(library, uuid)?;

    if output.should_prompt() {
        println!("Delete bookmark: {} - {}", short_id(bookmark.id), bookmark.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    library
        .delete_bookmark(uuid)
        .context("Failed to delete bookmark")?;

    output.success(&format!("Deleted bookmark: {}", uuid));

    Ok(())
}

/// Move a bookmark to a 1-based position within its category
pub fn move_to(library: &mut Library, id: String, position: usize, output: &Output) -> Result<()> {
    let uuid = parse_bookmark_id(&id, library)?;
    let bookmark = require_bookmark(library, uuid)?;
    let target = position_to_index(position)?;

    let ids: Vec<_> = library
        .bookmarks()
        .by_category(bookmark.category_id)
        .into_iter()
        .map(|b| b.id)
        .collect();
    let from = ids
        .iter()
        .position(|candidate| *candidate == uuid)
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found in its category: {}", uuid))?;

    let reordered = move_item(&ids, from, target);
    library
        .reorder_bookmarks(bookmark.category_id, &reordered)
        .context("Failed to reorder bookmarks")?;

    let new_position = reordered
        .iter()
        .position(|candidate| *candidate == uuid)
        .map(|i| i + 1)
        .unwrap_or(position);
    output.success(&format!(
        "Moved {} to position {}",
        short_id(uuid),
        new_position
    ));

    Ok(())
}

/// Open a bookmark in the system browser
pub fn open(library: &Library, id: String, output: &Output) -> Result<()> {
    let uuid = parse_bookmark_id(&id, library)?;
    let bookmark = require_bookmark(library, uuid)?;

    open::that(&bookmark.url).with_context(|| format!("Failed to open {}", bookmark.url))?;

    output.success(&format!("Opened {}", bookmark.url));
    Ok(())
}
