//! Counters recomputed from the live task list.
//!
//! Nothing here is cached or maintained incrementally. In particular the
//! stored [`Category::task_count`] is ignored in favor of counting tasks.

use chrono::{DateTime, TimeZone};
use taskflow_model::{Category, Task};

use super::urgency::Urgency;

/// Daily overview numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailySummary {
    /// Incomplete tasks due today.
    pub due_today: usize,
    /// Incomplete tasks due before today.
    pub overdue: usize,
    /// All tasks.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
}

impl DailySummary {
    /// Counts `tasks` relative to the day of `now`.
    #[must_use]
    pub fn compute<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Self {
        let mut summary = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            if task.completed {
                summary.completed += 1;
                continue;
            }
            match Urgency::classify(task.due_date.as_ref(), now) {
                Urgency::Today => summary.due_today += 1,
                Urgency::Overdue => summary.overdue += 1,
                Urgency::None => {}
            }
        }
        summary
    }
}

/// A category with the number of tasks that currently reference it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCount<'a> {
    /// The category.
    pub category: &'a Category,
    /// Tasks whose `category_id` points at it right now.
    pub live_count: usize,
}

/// Counts tasks per category, in category order.
#[must_use]
pub fn category_counts<'a>(tasks: &[Task], categories: &'a [Category]) -> Vec<CategoryCount<'a>> {
    categories
        .iter()
        .map(|category| CategoryCount {
            category,
            live_count: tasks
                .iter()
                .filter(|t| t.category_id.as_ref() == Some(&category.id))
                .count(),
        })
        .collect()
}

/// Looks up the category a task is filed under.
///
/// Returns `None` when the task has no category or its category no longer
/// exists.
#[must_use]
pub fn resolve_category<'a>(task: &Task, categories: &'a [Category]) -> Option<&'a Category> {
    let id = task.category_id.as_ref()?;
    categories.iter().find(|c| &c.id == id)
}
