//! Data models for progbox
//!
//! Defines the persisted records (`Bookmark`, `Category`) and the form
//! payloads the presentation layer submits to create or change them.
//! Form payloads never carry ids, ordering or timestamps; those are owned
//! by the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ordering::unique;

/// Current time truncated to whole milliseconds.
///
/// Timestamps are stored as epoch milliseconds, so records carry the same
/// precision in memory that they have on disk.
pub fn now_millis() -> DateTime<Utc> {
    let millis = Utc::now().timestamp_millis();
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

/// A saved URL filed under a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// The URL
    pub url: String,
    /// Optional description
    pub description: Option<String>,
    /// Owning category
    pub category_id: Uuid,
    /// Tags, duplicate-free, in display order
    pub tags: Vec<String>,
    /// Position within the category
    pub order: i64,
    /// When this bookmark was created
    pub created_at: DateTime<Utc>,
    /// When this bookmark was last updated
    pub updated_at: DateTime<Utc>,
    /// Optional icon URL
    pub icon: Option<String>,
}

impl Bookmark {
    /// Build a fresh record from form data at the given position
    pub fn from_form(form: BookmarkFormData, order: i64) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            title: form.title,
            url: form.url,
            description: non_empty(form.description),
            category_id: form.category_id,
            tags: unique(form.tags),
            order,
            created_at: now,
            updated_at: now,
            icon: non_empty(form.icon),
        }
    }

    /// Replace the user-editable fields, keeping id, order and `created_at`
    pub fn apply_form(&mut self, form: BookmarkFormData) {
        self.title = form.title;
        self.url = form.url;
        self.description = non_empty(form.description);
        self.category_id = form.category_id;
        self.tags = unique(form.tags);
        self.icon = non_empty(form.icon);
        self.updated_at = now_millis();
    }

    /// Check whether the bookmark carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Form data reflecting the current record, for edit flows
    pub fn to_form(&self) -> BookmarkFormData {
        BookmarkFormData {
            title: self.title.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            category_id: self.category_id,
            tags: self.tags.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// User-supplied bookmark fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkFormData {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: Uuid,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl BookmarkFormData {
    /// Create form data with just a title, URL and category
    pub fn new(title: impl Into<String>, url: impl Into<String>, category_id: Uuid) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: None,
            category_id,
            tags: Vec::new(),
            icon: None,
        }
    }

    /// Builder-style tag setter
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A user-defined grouping of bookmarks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional icon
    pub icon: Option<String>,
    /// Global display position
    pub order: i64,
    /// When this category was created
    pub created_at: DateTime<Utc>,
    /// When this category was last updated
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Build a fresh record from form data at the given position
    pub fn from_form(form: CategoryFormData, order: i64) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            name: form.name,
            description: non_empty(form.description),
            icon: non_empty(form.icon),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the fields present in `patch` and bump `updated_at`
    pub fn merge(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = non_empty(Some(description));
        }
        if let Some(icon) = patch.icon {
            self.icon = non_empty(Some(icon));
        }
        self.updated_at = now_millis();
    }
}

/// User-supplied category fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryFormData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl CategoryFormData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            icon: None,
        }
    }
}

/// Partial category update; `None` leaves a field untouched.
///
/// An empty string for `description` or `icon` clears the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl CategoryPatch {
    /// Patch that only renames
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.icon.is_none()
    }
}

/// A new position for one record in a batched reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub order: i64,
}

impl OrderUpdate {
    /// Assign `order = index` along the given sequence
    pub fn from_sequence(ordered_ids: &[Uuid]) -> Vec<Self> {
        ordered_ids
            .iter()
            .enumerate()
            .map(|(index, &id)| Self {
                id,
                order: index as i64,
            })
            .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
