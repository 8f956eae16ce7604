//! Category command handlers

use std::collections::HashMap;

use anyhow::{bail, Context, Result};

use progbox_core::ordering::move_item;
use progbox_core::{CategoryFormData, CategoryPatch, Library};

use super::{position_to_index, require_category, resolve_category};
use crate::output::{short_id, Output};
use crate::prompt::{confirm, prompt_clearable, prompt_with_default};

/// Create a new category
pub fn add(
    library: &mut Library,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    output: &Output,
) -> Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("Category name cannot be empty");
    }
    if library.categories().find_by_name(&name).is_some() {
        bail!("A category named '{}' already exists", name);
    }

    let form = CategoryFormData {
        name,
        description,
        icon,
    };
    let category = library
        .add_category(form)
        .context("Failed to create category")?;

    output.success(&format!("Created category: {}", category.id));
    output.print_category(&category);

    Ok(())
}

/// List categories in display order, or by name
pub fn list(library: &Library, by_name: bool, output: &Output) -> Result<()> {
    let categories = if by_name {
        library.categories().sorted_by_name()
    } else {
        library.categories().categories().to_vec()
    };

    let counts: HashMap<_, _> = categories
        .iter()
        .map(|c| (c.id, library.bookmarks().count_in_category(c.id)))
        .collect();

    output.print_categories(&categories, &counts);
    Ok(())
}

/// Edit a category, from flags or interactively
pub fn edit(library: &mut Library, id: String, patch: CategoryPatch, output: &Output) -> Result<()> {
    let uuid = resolve_category(&id, library)?;
    let category = require_category(library, uuid)?;

    let patch = if patch.is_empty() {
        println!("Editing category: {}", category.id);
        println!("Press Enter to keep current value, or type new value.\n");

        CategoryPatch {
            name: prompt_with_default("Name", &category.name)?,
            description: prompt_clearable(
                "Description",
                category.description.as_deref().unwrap_or(""),
            )?,
            icon: prompt_clearable("Icon", category.icon.as_deref().unwrap_or(""))?,
        }
    } else {
        patch
    };

    if let Some(ref name) = patch.name {
        if name.trim().is_empty() {
            bail!("Category name cannot be empty");
        }
    }

    let updated = library
        .update_category(uuid, patch)
        .context("Failed to update category")?;

    output.success("Category updated");
    output.print_category(&updated);

    Ok(())
}

/// Delete an empty category
pub fn delete(library: &mut Library, id: String, output: &Output) -> Result<()> {
    let uuid = resolve_category(&id, library)?;
    let category = require_category(library, uuid)?;

    if output.should_prompt() {
        println!("Delete category: {} - {}", short_id(category.id), category.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    library
        .delete_category(uuid)
        .context("Failed to delete category")?;

    output.success(&format!("Deleted category: {}", category.name));

    Ok(())
}

/// Move a category to a 1-based position
pub fn move_to(library: &mut Library, id: String, position: usize, output: &Output) -> Result<()> {
    let uuid = resolve_category(&id, library)?;
    let target = position_to_index(position)?;

    let ids: Vec<_> = library.categories().categories().iter().map(|c| c.id).collect();
    let from = ids
        .iter()
        .position(|candidate| *candidate == uuid)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", uuid))?;

    let reordered = move_item(&ids, from, target);
    library
        .reorder_categories(&reordered)
        .context("Failed to reorder categories")?;

    output.success(&format!(
        "Moved {} to position {}",
        short_id(uuid),
        target.min(ids.len() - 1) + 1
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use progbox_core::BookmarkFormData;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn names(library: &Library) -> Vec<String> {
        library
            .categories()
            .categories()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    #[test]
    fn test_add_rejects_blank_and_duplicate_names() {
        let mut library = Library::open_in_memory().unwrap();

        add(&mut library, "Docs".to_string(), None, None, &quiet()).unwrap();
        assert!(add(&mut library, "  ".to_string(), None, None, &quiet()).is_err());
        assert!(add(&mut library, "Docs".to_string(), None, None, &quiet()).is_err());
        assert_eq!(names(&library), vec!["Docs"]);
    }

    #[test]
    fn test_edit_with_patch() {
        let mut library = Library::open_in_memory().unwrap();
        add(&mut library, "Docs".to_string(), Some("old".to_string()), None, &quiet()).unwrap();

        let patch = CategoryPatch {
            name: Some("Reference".to_string()),
            description: Some(String::new()),
            icon: None,
        };
        edit(&mut library, "Docs".to_string(), patch, &quiet()).unwrap();

        let category = library.categories().find_by_name("Reference").unwrap();
        assert!(category.description.is_none());
    }

    #[test]
    fn test_delete_refuses_non_empty_category() {
        let mut library = Library::open_in_memory().unwrap();
        add(&mut library, "Docs".to_string(), None, None, &quiet()).unwrap();
        let docs = library.categories().find_by_name("Docs").unwrap().id;
        let bookmark = library
            .add_bookmark(BookmarkFormData::new("Rust", "https://rust-lang.org", docs))
            .unwrap();

        assert!(delete(&mut library, "Docs".to_string(), &quiet()).is_err());
        assert!(library.categories().get(docs).is_some());

        library.delete_bookmark(bookmark.id).unwrap();
        delete(&mut library, "Docs".to_string(), &quiet()).unwrap();
        assert!(library.categories().get(docs).is_none());
    }

    #[test]
    fn test_move_to_position() {
        let mut library = Library::open_in_memory().unwrap();
        for name in ["a", "b", "c"] {
            add(&mut library, name.to_string(), None, None, &quiet()).unwrap();
        }

        move_to(&mut library, "c".to_string(), 1, &quiet()).unwrap();
        assert_eq!(names(&library), vec!["c", "a", "b"]);

        move_to(&mut library, "c".to_string(), 2, &quiet()).unwrap();
        assert_eq!(names(&library), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_list_modes() {
        let mut library = Library::open_in_memory().unwrap();
        add(&mut library, "b".to_string(), None, None, &quiet()).unwrap();
        add(&mut library, "a".to_string(), None, None, &quiet()).unwrap();

        assert!(list(&library, false, &quiet()).is_ok());
        assert!(list(&library, true, &quiet()).is_ok());
    }
}
