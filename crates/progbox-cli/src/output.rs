//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::collections::HashMap;

use uuid::Uuid;

use progbox_core::ordering::group_by;
use progbox_core::url_utils::domain;
use progbox_core::{Bookmark, Category};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark, category: Option<&Category>) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", bookmark.id);
                println!("Title:       {}", bookmark.title);
                println!("URL:         {}", bookmark.url);
                if let Some(ref desc) = bookmark.description {
                    println!("Description: {}", desc);
                }
                match category {
                    Some(c) => println!("Category:    {}", c.name),
                    None => println!("Category:    {} (missing)", short_id(bookmark.category_id)),
                }
                println!("Position:    {}", bookmark.order);
                if !bookmark.tags.is_empty() {
                    println!("Tags:        {}", bookmark.tags.join(", "));
                }
                if let Some(ref icon) = bookmark.icon {
                    println!("Icon:        {}", icon);
                }
                println!("Created:     {}", bookmark.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:     {}", bookmark.updated_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(bookmark),
            OutputFormat::Quiet => println!("{}", bookmark.id),
        }
    }

    /// Print bookmarks of a single category, already in display order
    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in bookmarks {
                    println!("{}", bookmark_line(bookmark));
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => print_json(bookmarks),
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print bookmarks grouped under their categories, in category order
    pub fn print_grouped(&self, categories: &[Category], bookmarks: &[Bookmark]) {
        if self.format != OutputFormat::Human {
            self.print_bookmarks(bookmarks);
            return;
        }

        if bookmarks.is_empty() {
            println!("No bookmarks found.");
            return;
        }

        let mut groups = group_by(bookmarks, |b| b.category_id);
        for category in categories {
            let Some(mut items) = groups.remove(&category.id) else {
                continue;
            };
            items.sort_by_key(|b| b.order);
            println!("── {} ({}) ──", category.name, items.len());
            for bookmark in &items {
                println!("{}", bookmark_line(bookmark));
            }
            println!();
        }

        // Bookmarks whose category is gone
        for (category_id, items) in groups {
            println!("── {} (unknown category) ──", short_id(category_id));
            for bookmark in &items {
                println!("{}", bookmark_line(bookmark));
            }
            println!();
        }

        println!("{} bookmark(s)", bookmarks.len());
    }

    /// Print categories with their bookmark counts
    pub fn print_categories(&self, categories: &[Category], counts: &HashMap<Uuid, usize>) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for category in categories {
                    let count = counts.get(&category.id).copied().unwrap_or(0);
                    println!(
                        "{} | {:>3} | {} [{}]",
                        short_id(category.id),
                        category.order,
                        truncate(&category.name, 40),
                        count
                    );
                }
                println!("\n{} categor(ies)", categories.len());
            }
            OutputFormat::Json => print_json(categories),
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category.id);
                }
            }
        }
    }

    /// Print a single category
    pub fn print_category(&self, category: &Category) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", category.id);
                println!("Name:        {}", category.name);
                if let Some(ref desc) = category.description {
                    println!("Description: {}", desc);
                }
                if let Some(ref icon) = category.icon {
                    println!("Icon:        {}", icon);
                }
                println!("Position:    {}", category.order);
            }
            OutputFormat::Json => print_json(category),
            OutputFormat::Quiet => println!("{}", category.id),
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[(String, i64)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                print_json(&json_tags);
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn bookmark_line(bookmark: &Bookmark) -> String {
    format!(
        "{} | {:>3} | {} | {}",
        short_id(bookmark.id),
        bookmark.order,
        truncate(&bookmark.title, 35),
        truncate(&domain(&bookmark.url), 30)
    )
}

/// First eight characters of an id
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
