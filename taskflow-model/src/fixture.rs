//! JSON fixture decoding for seeding the stores.
//!
//! Fixtures are plain JSON arrays of [`Task`] or [`Category`] records in
//! their camelCase serialized form. Decoding rejects duplicate ids, since the
//! stores assume ids are unique within a collection.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::category::{Category, CategoryId};
use crate::task::{Task, TaskId};

/// Error type for fixture loading.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture is not valid JSON for the expected record type.
    #[error("invalid fixture json: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read a fixture file.
    #[error("failed to read fixture {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Two task records share an id.
    #[error("duplicate task id in fixture: {0}")]
    DuplicateTaskId(TaskId),
    /// Two category records share an id.
    #[error("duplicate category id in fixture: {0}")]
    DuplicateCategoryId(CategoryId),
}

/// Decodes a JSON array of tasks.
///
/// # Errors
///
/// Returns [`FixtureError::Json`] on malformed input or
/// [`FixtureError::DuplicateTaskId`] if an id repeats.
pub fn decode_tasks(json: &str) -> Result<Vec<Task>, FixtureError> {
    let tasks: Vec<Task> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(&task.id) {
            return Err(FixtureError::DuplicateTaskId(task.id.clone()));
        }
    }
    Ok(tasks)
}

/// Decodes a JSON array of categories.
///
/// # Errors
///
/// Returns [`FixtureError::Json`] on malformed input or
/// [`FixtureError::DuplicateCategoryId`] if an id repeats.
pub fn decode_categories(json: &str) -> Result<Vec<Category>, FixtureError> {
    let categories: Vec<Category> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(categories.len());
    for category in &categories {
        if !seen.insert(&category.id) {
            return Err(FixtureError::DuplicateCategoryId(category.id.clone()));
        }
    }
    Ok(categories)
}

/// Reads a fixture file into a string.
///
/// # Errors
///
/// Returns [`FixtureError::ReadFile`] if the file cannot be read.
pub fn read_fixture(path: &Path) -> Result<String, FixtureError> {
    std::fs::read_to_string(path).map_err(|source| FixtureError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
