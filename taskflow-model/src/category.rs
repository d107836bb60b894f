//! Category records for `TaskFlow`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#5B4CFF";

/// Unique identifier for a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Generates a new time-ordered category identifier (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A colored bucket that tasks can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Display color, usually a `#RRGGBB` hex string.
    #[serde(default = "default_color")]
    pub color: String,
    /// Count recorded when the category was created.
    ///
    /// Nothing keeps this up to date; derive live counts from the task list.
    #[serde(default)]
    pub task_count: u32,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

/// The user-supplied fields of a new category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDraft {
    /// Category name.
    pub name: String,
    /// Optional color; [`DEFAULT_CATEGORY_COLOR`] when omitted.
    pub color: Option<String>,
}

impl CategoryDraft {
    /// Creates a draft with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builds the stored record with a zero task count.
    #[must_use]
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            color: self.color.unwrap_or_else(default_color),
            task_count: 0,
        }
    }
}

/// A partial update to a category. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    /// New name.
    pub name: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New recorded task count.
    pub task_count: Option<u32>,
}

impl CategoryPatch {
    /// Overwrites the fields of `category` that this patch sets.
    pub fn apply_to(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(task_count) = self.task_count {
            category.task_count = task_count;
        }
    }
}
