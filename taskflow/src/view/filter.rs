//! Filter state and the filtered task view.

use std::str::FromStr;

use taskflow_model::{CategoryId, Priority, Task};

/// Which tasks to show by completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Only tasks that are not completed.
    Active,
    /// Only completed tasks.
    Completed,
}

impl StatusFilter {
    /// Returns `true` if a task with the given completion flag passes.
    #[must_use]
    pub const fn admits(&self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// Returns the lowercase name used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`StatusFilter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter: {0} (expected all, active or completed)")]
pub struct ParseStatusError(pub String);

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// The current search text and category, priority and status selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring matched against title and description.
    pub search: String,
    /// Only tasks filed under this category.
    pub category: Option<CategoryId>,
    /// Only tasks with this priority.
    pub priority: Option<Priority>,
    /// Completion filter.
    pub status: StatusFilter,
}

impl FilterState {
    /// A filter that passes every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Selects a category.
    #[must_use]
    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Selects a priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Selects a completion status.
    #[must_use]
    pub const fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Returns `true` if search, priority or status narrow the view.
    ///
    /// The category selection is not counted: picking a category in the
    /// sidebar is navigation, not filtering.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.priority.is_some() || self.status != StatusFilter::All
    }

    /// Resets every selection to its neutral value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if `task` passes every predicate.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        TaskMatcher::new(self).matches(task)
    }
}

/// A [`FilterState`] with its search text lowercased once up front.
struct TaskMatcher<'a> {
    filter: &'a FilterState,
    needle: String,
}

impl<'a> TaskMatcher<'a> {
    fn new(filter: &'a FilterState) -> Self {
        Self {
            filter,
            needle: filter.search.to_lowercase(),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        if !self.needle.is_empty() && !task.matches_lowercase(&self.needle) {
            return false;
        }
        if self
            .filter
            .category
            .as_ref()
            .is_some_and(|c| task.category_id.as_ref() != Some(c))
        {
            return false;
        }
        if self.filter.priority.is_some_and(|p| task.priority != p) {
            return false;
        }
        self.filter.status.admits(task.completed)
    }
}

/// Returns the tasks that pass `filter`, in their original order.
#[must_use]
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &FilterState) -> Vec<&'a Task> {
    let matcher = TaskMatcher::new(filter);
    tasks.iter().filter(|t| matcher.matches(t)).collect()
}
