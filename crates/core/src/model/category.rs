use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CategoryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category label cannot be empty")]
    EmptyLabel,
}

/// Category id → display label, as served to clients.
pub type CategoryMap = BTreeMap<CategoryId, String>;

/// A named grouping that questions reference.
///
/// Serialized as `{"id": .., "type": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    #[serde(rename = "type")]
    label: String,
}

impl Category {
    /// Creates a new Category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyLabel` if the label is empty or whitespace-only.
    pub fn new(id: CategoryId, label: impl Into<String>) -> Result<Self, CategoryError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(CategoryError::EmptyLabel);
        }
        Ok(Self {
            id,
            label: label.trim().to_owned(),
        })
    }

    /// Rebuilds a category read back from storage, keeping the label verbatim.
    #[must_use]
    pub fn from_stored(id: CategoryId, label: String) -> Self {
        Self { id, label }
    }

    /// Re-checks the label, for categories that did not come through [`Category::new`].
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyLabel` if the label is empty or whitespace-only.
    pub fn check(&self) -> Result<(), CategoryError> {
        if self.label.trim().is_empty() {
            return Err(CategoryError::EmptyLabel);
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Builds the id → label index over every given category.
#[must_use]
pub fn category_map<'a>(categories: impl IntoIterator<Item = &'a Category>) -> CategoryMap {
    categories
        .into_iter()
        .map(|c| (c.id(), c.label().to_owned()))
        .collect()
}
