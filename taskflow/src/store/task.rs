//! The task store.

use chrono::Utc;
use parking_lot::RwLock;
use taskflow_model::{Task, TaskDraft, TaskId, TaskPatch};

use super::{Latency, StoreError};

/// Ordered in-memory task collection, most recently created first.
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
    latency: Latency,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self::with_tasks(Vec::new(), latency)
    }

    /// Creates a store seeded with `tasks` in the given order.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>, latency: Latency) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            latency,
        }
    }

    /// Number of tasks currently held. Does not wait.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    /// Returns `true` if the store holds no tasks. Does not wait.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }

    /// Returns a copy of every task in store order.
    pub async fn get_all(&self) -> Vec<Task> {
        let delay = self.latency.wait().await;
        let tasks = self.tasks.read().clone();
        tracing::debug!(count = tasks.len(), latency_ms = delay.as_millis(), "tasks fetched");
        tasks
    }

    /// Returns a copy of one task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] if no task has `id`.
    pub async fn get_by_id(&self, id: &TaskId) -> Result<Task, StoreError> {
        let delay = self.latency.wait().await;
        tracing::debug!(task_id = %id, latency_ms = delay.as_millis(), "task lookup");
        self.tasks
            .read()
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))
    }

    /// Creates a task from `draft` and puts it at the front of the list.
    ///
    /// No validation happens here; omitted fields take their defaults.
    pub async fn create(&self, draft: TaskDraft) -> Task {
        let delay = self.latency.wait().await;
        let task = draft.into_task(TaskId::generate(), Utc::now());
        self.tasks.write().insert(0, task.clone());
        tracing::debug!(task_id = %task.id, latency_ms = delay.as_millis(), "task created");
        task
    }

    /// Merges `patch` onto a task and returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] if no task has `id`.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let delay = self.latency.wait().await;
        let mut tasks = self.tasks.write();
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))?;
        patch.apply_to(task);
        let updated = task.clone();
        drop(tasks);
        tracing::debug!(task_id = %id, latency_ms = delay.as_millis(), "task updated");
        Ok(updated)
    }

    /// Removes a task and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] if no task has `id`.
    pub async fn delete(&self, id: &TaskId) -> Result<Task, StoreError> {
        let delay = self.latency.wait().await;
        let mut tasks = self.tasks.write();
        let index = tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))?;
        let removed = tasks.remove(index);
        drop(tasks);
        tracing::debug!(task_id = %id, latency_ms = delay.as_millis(), "task deleted");
        Ok(removed)
    }
}
