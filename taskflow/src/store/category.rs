//! The category store.

use parking_lot::RwLock;
use taskflow_model::{Category, CategoryDraft, CategoryId, CategoryPatch};

use super::{Latency, StoreError};

/// Ordered in-memory category collection, oldest first.
///
/// Deleting a category never touches tasks that reference it.
pub struct CategoryStore {
    categories: RwLock<Vec<Category>>,
    latency: Latency,
}

impl CategoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self::with_categories(Vec::new(), latency)
    }

    /// Creates a store seeded with `categories` in the given order.
    #[must_use]
    pub fn with_categories(categories: Vec<Category>, latency: Latency) -> Self {
        Self {
            categories: RwLock::new(categories),
            latency,
        }
    }

    /// Number of categories currently held. Does not wait.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.read().len()
    }

    /// Returns `true` if the store holds no categories. Does not wait.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.read().is_empty()
    }

    /// Returns a copy of every category in store order.
    pub async fn get_all(&self) -> Vec<Category> {
        let delay = self.latency.wait().await;
        let categories = self.categories.read().clone();
        tracing::debug!(
            count = categories.len(),
            latency_ms = delay.as_millis(),
            "categories fetched"
        );
        categories
    }

    /// Returns a copy of one category.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CategoryNotFound`] if no category has `id`.
    pub async fn get_by_id(&self, id: &CategoryId) -> Result<Category, StoreError> {
        let delay = self.latency.wait().await;
        tracing::debug!(category_id = %id, latency_ms = delay.as_millis(), "category lookup");
        self.categories
            .read()
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))
    }

    /// Creates a category from `draft` and appends it.
    pub async fn create(&self, draft: CategoryDraft) -> Category {
        let delay = self.latency.wait().await;
        let category = draft.into_category(CategoryId::generate());
        self.categories.write().push(category.clone());
        tracing::debug!(
            category_id = %category.id,
            latency_ms = delay.as_millis(),
            "category created"
        );
        category
    }

    /// Merges `patch` onto a category and returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CategoryNotFound`] if no category has `id`.
    pub async fn update(
        &self,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, StoreError> {
        let delay = self.latency.wait().await;
        let mut categories = self.categories.write();
        let category = categories
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        patch.apply_to(category);
        let updated = category.clone();
        drop(categories);
        tracing::debug!(category_id = %id, latency_ms = delay.as_millis(), "category updated");
        Ok(updated)
    }

    /// Removes a category and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CategoryNotFound`] if no category has `id`.
    pub async fn delete(&self, id: &CategoryId) -> Result<Category, StoreError> {
        let delay = self.latency.wait().await;
        let mut categories = self.categories.write();
        let index = categories
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        let removed = categories.remove(index);
        drop(categories);
        tracing::debug!(category_id = %id, latency_ms = delay.as_millis(), "category deleted");
        Ok(removed)
    }
}
