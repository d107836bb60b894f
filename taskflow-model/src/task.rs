//! Task records for `TaskFlow`.
//!
//! A [`Task`] is created from a [`TaskDraft`] (which carries only the fields a
//! user supplies) and changed afterwards through a [`TaskPatch`], where every
//! field is optional and only the fields that are set overwrite the record.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::CategoryId;

/// Unique identifier for a task.
///
/// Freshly created tasks get a UUID v7 string. Records loaded from fixtures
/// may carry any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new time-ordered task identifier (UUID v7).
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

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How urgent a task is to its owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default for new tasks.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the lowercase name used in fixtures and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Priority`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority: {0} (expected low, medium or high)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Short title shown in lists.
    pub title: String,
    /// Free-form notes; empty when none were given.
    #[serde(default)]
    pub description: String,
    /// Category this task is filed under. May dangle after the category is
    /// deleted.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Task priority.
    #[serde(default)]
    pub priority: Priority,
    /// When the task is due, if ever.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// When the task was created. Never changes.
    pub created_at: DateTime<Utc>,
    /// When the task was last marked completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Returns `true` when the title or description contains `needle`,
    /// ignoring case. `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// The user-supplied fields of a task that does not exist yet.
///
/// Everything except the title is optional; missing fields take their
/// defaults in [`TaskDraft::into_task`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Optional notes.
    pub description: Option<String>,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Optional priority (defaults to [`Priority::Medium`]).
    pub priority: Option<Priority>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Creates a draft with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Files the task under a category.
    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Builds the stored record, filling in defaults for omitted fields.
    ///
    /// New tasks always start incomplete with no completion time.
    #[must_use]
    pub fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            category_id: self.category_id,
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            completed: false,
            created_at,
            completed_at: None,
        }
    }
}

/// A partial update to a task.
///
/// `None` leaves a field untouched. For fields that are themselves optional,
/// `Some(None)` clears the field and `Some(Some(v))` sets it.
///
/// Setting `completed` does not touch `completed_at`; callers toggling
/// completion set both (see [`TaskPatch::completion`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category reference.
    pub category_id: Option<Option<CategoryId>>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New completion flag.
    pub completed: Option<bool>,
    /// New completion timestamp.
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// A patch that sets the completion flag and completion time together.
    #[must_use]
    pub const fn completion(completed: bool, completed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            title: None,
            description: None,
            category_id: None,
            priority: None,
            due_date: None,
            completed: Some(completed),
            completed_at: Some(completed_at),
        }
    }

    /// Returns `true` if the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
            && self.completed_at.is_none()
    }

    /// Overwrites the fields of `task` that this patch sets.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
    }
}
