use std::sync::Arc;

use storage::repository::CategoryRepository;
use trivia_core::model::{Category, CategoryId, CategoryMap, category_map};

use crate::error::{OperationError, QuestionServiceError};

/// Read-only index of categories.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    #[must_use]
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// Map every category id to its label.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::NotFound` when no category exists.
    /// Returns `QuestionServiceError::Internal` if repository access fails.
    pub async fn all_categories(&self) -> Result<CategoryMap, QuestionServiceError> {
        let map = self
            .category_map()
            .await
            .map_err(QuestionServiceError::Internal)?;
        if map.is_empty() {
            tracing::debug!("category index is empty");
            return Err(QuestionServiceError::not_found("no categories available"));
        }
        Ok(map)
    }

    /// Fetch a category by ID.
    ///
    /// Returns `Ok(None)` when the category does not exist.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Storage` if repository access fails.
    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, OperationError> {
        let category = self.categories.get_category(id).await?;
        Ok(category)
    }

    pub(crate) async fn category_map(&self) -> Result<CategoryMap, OperationError> {
        let categories = self.categories.list_categories().await?;
        Ok(category_map(&categories))
    }

    /// The configured default category; it must exist.
    pub(crate) async fn default_category(&self, id: CategoryId) -> Result<Category, OperationError> {
        self.get_category(id)
            .await?
            .ok_or(OperationError::MissingDefaultCategory(id))
    }
}
