//! Derived views over the task list.
//!
//! Everything in this module is a pure function of the task and category
//! slices it is given: filtering, due-date urgency, and summary counts.

pub mod filter;
pub mod summary;
pub mod urgency;

pub use filter::{FilterState, ParseStatusError, StatusFilter, filter_tasks};
pub use summary::{CategoryCount, DailySummary, category_counts, resolve_category};
pub use urgency::Urgency;

use chrono::{DateTime, TimeZone};
use taskflow_model::{Category, Task};

/// One line of the task list: the task, its resolved category, its badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRow<'a> {
    /// The task.
    pub task: &'a Task,
    /// Its category, or `None` if uncategorized or the category is gone.
    pub category: Option<&'a Category>,
    /// Due-date badge.
    pub urgency: Urgency,
}

/// Builds display rows for already-filtered tasks.
#[must_use]
pub fn task_rows<'a, Tz: TimeZone>(
    tasks: &[&'a Task],
    categories: &'a [Category],
    now: &DateTime<Tz>,
) -> Vec<TaskRow<'a>> {
    tasks
        .iter()
        .map(|&task| TaskRow {
            task,
            category: resolve_category(task, categories),
            urgency: Urgency::classify(task.due_date.as_ref(), now),
        })
        .collect()
}
