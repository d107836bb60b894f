//! In-memory task and category stores with simulated service latency.
//!
//! Each store owns an ordered `Vec` of records behind a [`RwLock`]. Every
//! operation first waits out a [`Latency`] delay and then mutates or copies
//! the collection in one synchronous step, so no lock is ever held across an
//! `.await` and no caller observes a partial write. Concurrent calls draw
//! independent delays and may therefore finish in any order.
//!
//! [`RwLock`]: parking_lot::RwLock

pub mod category;
pub mod task;

use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use taskflow_model::fixture::{self, FixtureError};
use taskflow_model::{CategoryId, TaskId};
use thiserror::Error;

pub use category::CategoryStore;
pub use task::TaskStore;

/// Task fixture compiled into the binary.
pub const BUILTIN_TASKS: &str = include_str!("../../fixtures/tasks.json");

/// Category fixture compiled into the binary.
pub const BUILTIN_CATEGORIES: &str = include_str!("../../fixtures/categories.json");

/// Errors returned by store operations.
///
/// A missing id is the only way a store call can fail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No task has the given id.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// No category has the given id.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),
}

/// Artificial delay applied before every store operation.
///
/// Each call samples uniformly from `min..=max`, so back-to-back calls can
/// complete out of order. [`Latency::none`] skips the delay entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self::between(Duration::from_millis(200), Duration::from_millis(400))
    }
}

impl Latency {
    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// The same delay on every call.
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    /// A delay drawn from `min..=max`. The bounds are swapped if reversed.
    #[must_use]
    pub fn between(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// The range delays are drawn from.
    #[must_use]
    pub const fn range(&self) -> RangeInclusive<Duration> {
        self.min..=self.max
    }

    /// Draws one delay.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            self.min
        } else {
            rand::rng().random_range(self.min..=self.max)
        }
    }

    /// Sleeps for one sampled delay and returns how long that was.
    pub async fn wait(&self) -> Duration {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        delay
    }
}

/// Where to seed the stores from. `None` means the built-in fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource<'a> {
    /// Path to a JSON task fixture.
    pub tasks: Option<&'a Path>,
    /// Path to a JSON category fixture.
    pub categories: Option<&'a Path>,
}

/// Both stores, shared by handle.
///
/// Built once by the composition root and cloned into whatever needs to
/// call the stores; clones share the same underlying collections.
#[derive(Clone)]
pub struct Stores {
    /// The task store.
    pub tasks: Arc<TaskStore>,
    /// The category store.
    pub categories: Arc<CategoryStore>,
}

impl Stores {
    /// Wraps two already-built stores.
    #[must_use]
    pub fn new(tasks: TaskStore, categories: CategoryStore) -> Self {
        Self {
            tasks: Arc::new(tasks),
            categories: Arc::new(categories),
        }
    }

    /// Seeds both stores from fixture data.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if a fixture file cannot be read or decoded.
    pub fn from_fixtures(
        source: FixtureSource<'_>,
        latency: Latency,
    ) -> Result<Self, FixtureError> {
        let tasks_json = match source.tasks {
            Some(path) => fixture::read_fixture(path)?,
            None => BUILTIN_TASKS.to_string(),
        };
        let categories_json = match source.categories {
            Some(path) => fixture::read_fixture(path)?,
            None => BUILTIN_CATEGORIES.to_string(),
        };

        let tasks = fixture::decode_tasks(&tasks_json)?;
        let categories = fixture::decode_categories(&categories_json)?;
        tracing::info!(
            tasks = tasks.len(),
            categories = categories.len(),
            "seeded stores from fixtures"
        );

        Ok(Self::new(
            TaskStore::with_tasks(tasks, latency),
            CategoryStore::with_categories(categories, latency),
        ))
    }
}
