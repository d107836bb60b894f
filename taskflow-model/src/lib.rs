//! Shared record definitions for `TaskFlow` tasks and categories.

pub mod category;
pub mod fixture;
pub mod task;

pub use category::{Category, CategoryDraft, CategoryId, CategoryPatch, DEFAULT_CATEGORY_COLOR};
pub use fixture::FixtureError;
pub use task::{ParsePriorityError, Priority, Task, TaskDraft, TaskId, TaskPatch};
