//! Intent dispatcher between the board and the stores.
//!
//! The board sends [`Intent`]s and drains [`Outcome`]s. Every intent runs as
//! its own tokio task, so a slow call never holds up a fast one and
//! outcomes can arrive in a different order than the intents were sent.
//! Each outcome names the entity it concerns and the board applies it by id.
//!
//! ```text
//! Board  ─── Intent ──→  dispatcher ──spawn──→ store call
//!        ←── Outcome ──────────────────────────┘
//! ```

use std::fmt;

use taskflow_model::{
    Category, CategoryDraft, CategoryId, CategoryPatch, Task, TaskDraft, TaskId, TaskPatch,
};
use tokio::sync::mpsc;

use crate::store::{StoreError, Stores};

/// Default channel capacity for intents and outcomes.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Requests sent from the board to the stores.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Fetch both collections.
    Load,
    /// Create a task.
    CreateTask(TaskDraft),
    /// Patch a task.
    UpdateTask {
        /// Task to change.
        id: TaskId,
        /// Fields to overwrite.
        patch: TaskPatch,
    },
    /// Delete a task.
    DeleteTask(TaskId),
    /// Create a category.
    CreateCategory(CategoryDraft),
    /// Patch a category.
    UpdateCategory {
        /// Category to change.
        id: CategoryId,
        /// Fields to overwrite.
        patch: CategoryPatch,
    },
    /// Delete a category. Tasks referencing it are left alone.
    DeleteCategory(CategoryId),
    /// Stop accepting intents. In-flight intents still finish.
    Shutdown,
}

/// What a failed intent was trying to do.
///
/// Loads and creates cannot fail, so only the id-addressed intents appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// [`Intent::UpdateTask`].
    UpdateTask,
    /// [`Intent::DeleteTask`].
    DeleteTask,
    /// [`Intent::UpdateCategory`].
    UpdateCategory,
    /// [`Intent::DeleteCategory`].
    DeleteCategory,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UpdateTask => "update task",
            Self::DeleteTask => "delete task",
            Self::UpdateCategory => "update category",
            Self::DeleteCategory => "delete category",
        };
        f.write_str(text)
    }
}

/// Results sent from the stores back to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Both collections were fetched.
    Loaded {
        /// Every task, in store order.
        tasks: Vec<Task>,
        /// Every category, in store order.
        categories: Vec<Category>,
    },
    /// A task was created.
    TaskCreated(Task),
    /// A task was patched.
    TaskUpdated(Task),
    /// A task was deleted.
    TaskDeleted(TaskId),
    /// A category was created.
    CategoryCreated(Category),
    /// A category was patched.
    CategoryUpdated(Category),
    /// A category was deleted.
    CategoryDeleted(CategoryId),
    /// A store call failed; nothing changed.
    Failed {
        /// What was attempted.
        action: Action,
        /// Why it failed.
        error: StoreError,
    },
}

/// Runs one intent against the stores and reports what happened.
///
/// Returns `None` for [`Intent::Shutdown`].
pub async fn execute(stores: &Stores, intent: Intent) -> Option<Outcome> {
    let outcome = match intent {
        Intent::Load => {
            let (tasks, categories) =
                futures_util::future::join(stores.tasks.get_all(), stores.categories.get_all())
                    .await;
            Outcome::Loaded { tasks, categories }
        }
        Intent::CreateTask(draft) => Outcome::TaskCreated(stores.tasks.create(draft).await),
        Intent::UpdateTask { id, patch } => match stores.tasks.update(&id, patch).await {
            Ok(task) => Outcome::TaskUpdated(task),
            Err(error) => failed(Action::UpdateTask, error),
        },
        Intent::DeleteTask(id) => match stores.tasks.delete(&id).await {
            Ok(_) => Outcome::TaskDeleted(id),
            Err(error) => failed(Action::DeleteTask, error),
        },
        Intent::CreateCategory(draft) => {
            Outcome::CategoryCreated(stores.categories.create(draft).await)
        }
        Intent::UpdateCategory { id, patch } => {
            match stores.categories.update(&id, patch).await {
                Ok(category) => Outcome::CategoryUpdated(category),
                Err(error) => failed(Action::UpdateCategory, error),
            }
        }
        Intent::DeleteCategory(id) => match stores.categories.delete(&id).await {
            Ok(_) => Outcome::CategoryDeleted(id),
            Err(error) => failed(Action::DeleteCategory, error),
        },
        Intent::Shutdown => return None,
    };
    Some(outcome)
}

fn failed(action: Action, error: StoreError) -> Outcome {
    tracing::warn!(%action, error = %error, "store call failed");
    Outcome::Failed { action, error }
}

/// Spawns the dispatcher and returns its channel handles.
///
/// The dispatcher runs until it receives [`Intent::Shutdown`] or every
/// intent sender is dropped. Outcomes of intents already in flight are still
/// delivered after shutdown; the outcome channel closes once they are all
/// done. Must be called from within a tokio runtime.
#[must_use]
pub fn spawn_dispatcher(
    stores: Stores,
    capacity: usize,
) -> (mpsc::Sender<Intent>, mpsc::Receiver<Outcome>) {
    let (intent_tx, intent_rx) = mpsc::channel::<Intent>(capacity);
    let (outcome_tx, outcome_rx) = mpsc::channel::<Outcome>(capacity);

    tokio::spawn(async move {
        intent_loop(stores, intent_rx, outcome_tx).await;
    });

    (intent_tx, outcome_rx)
}

/// Background task: receive intents and spawn one worker per intent.
async fn intent_loop(
    stores: Stores,
    mut intent_rx: mpsc::Receiver<Intent>,
    outcome_tx: mpsc::Sender<Outcome>,
) {
    while let Some(intent) = intent_rx.recv().await {
        if matches!(intent, Intent::Shutdown) {
            tracing::debug!("dispatcher shutting down");
            break;
        }
        let stores = stores.clone();
        let outcome_tx = outcome_tx.clone();
        tokio::spawn(async move {
            let Some(outcome) = execute(&stores, intent).await else {
                return;
            };
            if outcome_tx.send(outcome).await.is_err() {
                tracing::debug!("outcome receiver dropped");
            }
        });
    }
}
