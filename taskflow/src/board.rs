//! Board state: the local copy of tasks and categories that gets rendered.
//!
//! The board never talks to the stores directly. It builds [`Intent`]s for
//! user actions and folds [`Outcome`]s back in as they arrive. Outcomes are
//! applied by entity id, so a late response for one task never clobbers
//! another, whatever order the responses come back in.

use std::collections::VecDeque;

use chrono::{DateTime, TimeZone, Utc};
use taskflow_model::{Category, CategoryDraft, Task, TaskDraft, TaskId, TaskPatch};
use thiserror::Error;

use crate::dispatch::{Intent, Outcome};
use crate::view::{self, CategoryCount, DailySummary, FilterState, TaskRow};

/// Default number of notices kept before the oldest is dropped.
pub const DEFAULT_MAX_NOTICES: usize = 5;

/// Errors from board-level input checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Task title is empty or only whitespace.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Category name is empty or only whitespace.
    #[error("category name cannot be empty")]
    NameEmpty,
    /// The task is not on the board.
    #[error("task not on board: {0}")]
    UnknownTask(TaskId),
}

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Something worked.
    Success,
    /// Something failed; data is unchanged.
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Success or error.
    pub level: NoticeLevel,
    /// Text to show.
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Local task and category lists plus the current filter.
#[derive(Debug)]
pub struct Board {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    filter: FilterState,
    notices: VecDeque<Notice>,
    max_notices: usize,
    loaded: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty, not-yet-loaded board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            categories: Vec::new(),
            filter: FilterState::default(),
            notices: VecDeque::new(),
            max_notices: DEFAULT_MAX_NOTICES,
            loaded: false,
        }
    }

    /// Sets how many notices are kept.
    #[must_use]
    pub const fn with_max_notices(mut self, max_notices: usize) -> Self {
        self.max_notices = max_notices;
        self
    }

    /// Tasks in store order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Categories in store order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The current filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Mutable access to the current filter.
    pub const fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    /// Whether a [`Outcome::Loaded`] has been applied yet.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Pending notices, oldest first.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Removes and returns all pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn push_notice(&mut self, notice: Notice) {
        if self.max_notices == 0 {
            return;
        }
        while self.notices.len() >= self.max_notices {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    /// Folds one outcome into the local state.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded { tasks, categories } => {
                tracing::info!(
                    tasks = tasks.len(),
                    categories = categories.len(),
                    "board loaded"
                );
                self.tasks = tasks;
                self.categories = categories;
                self.loaded = true;
            }
            Outcome::TaskCreated(task) => {
                if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *existing = task;
                } else {
                    self.tasks.insert(0, task);
                }
                self.push_notice(Notice::success("Task created successfully!"));
            }
            Outcome::TaskUpdated(task) => {
                let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
                    tracing::debug!(task_id = %task.id, "update for task no longer on board");
                    return;
                };
                let message = match (existing.completed, task.completed) {
                    (false, true) => "Task completed!",
                    (true, false) => "Task marked as active",
                    _ => "Task updated",
                };
                *existing = task;
                self.push_notice(Notice::success(message));
            }
            Outcome::TaskDeleted(id) => {
                self.tasks.retain(|t| t.id != id);
                self.push_notice(Notice::success("Task deleted"));
            }
            Outcome::CategoryCreated(category) => {
                if let Some(existing) = self.categories.iter_mut().find(|c| c.id == category.id) {
                    *existing = category;
                } else {
                    self.categories.push(category);
                }
                self.push_notice(Notice::success("Category created successfully!"));
            }
            Outcome::CategoryUpdated(category) => {
                let Some(existing) = self.categories.iter_mut().find(|c| c.id == category.id)
                else {
                    tracing::debug!(
                        category_id = %category.id,
                        "update for category no longer on board"
                    );
                    return;
                };
                *existing = category;
                self.push_notice(Notice::success("Category updated"));
            }
            Outcome::CategoryDeleted(id) => {
                self.categories.retain(|c| c.id != id);
                if self.filter.category.as_ref() == Some(&id) {
                    self.filter.category = None;
                }
                self.push_notice(Notice::success("Category deleted"));
            }
            Outcome::Failed { action, error } => {
                self.push_notice(Notice::error(format!("Failed to {action}: {error}")));
            }
        }
    }

    /// Builds the intent for creating a task.
    ///
    /// An empty category id is treated as no category.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TitleEmpty`] if the title is blank.
    pub fn create_task_intent(mut draft: TaskDraft) -> Result<Intent, BoardError> {
        if draft.title.trim().is_empty() {
            return Err(BoardError::TitleEmpty);
        }
        if draft
            .category_id
            .as_ref()
            .is_some_and(|id| id.as_str().is_empty())
        {
            draft.category_id = None;
        }
        Ok(Intent::CreateTask(draft))
    }

    /// Builds the intent for creating a category.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NameEmpty`] if the name is blank.
    pub fn create_category_intent(draft: CategoryDraft) -> Result<Intent, BoardError> {
        if draft.name.trim().is_empty() {
            return Err(BoardError::NameEmpty);
        }
        Ok(Intent::CreateCategory(draft))
    }

    /// Builds the intent that flips a task between completed and active.
    ///
    /// Completing stamps `completed_at` with `now`; reactivating clears it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] if the task is not on the board.
    pub fn toggle_intent(&self, id: &TaskId, now: DateTime<Utc>) -> Result<Intent, BoardError> {
        let task = self
            .tasks
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        let completed = !task.completed;
        let completed_at = completed.then_some(now);
        Ok(Intent::UpdateTask {
            id: id.clone(),
            patch: TaskPatch::completion(completed, completed_at),
        })
    }

    /// Tasks passing the current filter, in store order.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        view::filter_tasks(&self.tasks, &self.filter)
    }

    /// Display rows for the visible tasks.
    #[must_use]
    pub fn visible_rows<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<TaskRow<'_>> {
        view::task_rows(&self.visible_tasks(), &self.categories, now)
    }

    /// Daily counters over all tasks, ignoring the filter.
    #[must_use]
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DailySummary {
        DailySummary::compute(&self.tasks, now)
    }

    /// Live task counts per category.
    #[must_use]
    pub fn category_counts(&self) -> Vec<CategoryCount<'_>> {
        view::category_counts(&self.tasks, &self.categories)
    }
}
