use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use trivia_core::model::{
    Category, CategoryId, Difficulty, Question, QuestionId, ValidatedQuestion,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a question whose id the store assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestionRecord {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: Difficulty,
}

impl NewQuestionRecord {
    #[must_use]
    pub fn from_validated(validated: ValidatedQuestion) -> Self {
        Self {
            question: validated.question,
            answer: validated.answer,
            category: validated.category,
            difficulty: validated.difficulty,
        }
    }

    fn into_question(self, id: QuestionId) -> Question {
        Question::new(id, self.question, self.answer, self.category, self.difficulty)
    }
}

/// Repository contract for categories. Categories are seeded externally and
/// read-only to the question services.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Persist or update a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the category cannot be stored.
    async fn upsert_category(&self, category: &Category) -> Result<(), StorageError>;

    /// Fetch a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing category is `Ok(None)`.
    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError>;

    /// List every category ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError>;
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a question and return its newly assigned, never reused, ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn insert_new_question(
        &self,
        record: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError>;

    /// Fetch a question by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing question is `Ok(None)`.
    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError>;

    /// List every question ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// List questions referencing `category`, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_questions_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Question>, StorageError>;

    /// Delete a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question does not exist, or other storage errors.
    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError>;
}

#[derive(Default)]
struct QuestionTable {
    rows: BTreeMap<QuestionId, Question>,
    last_id: u64,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    categories: Arc<Mutex<BTreeMap<CategoryId, Category>>>,
    questions: Arc<Mutex<QuestionTable>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn upsert_category(&self, category: &Category) -> Result<(), StorageError> {
        category
            .check()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(category.id(), category.clone());
        Ok(())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        let guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn insert_new_question(
        &self,
        record: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.last_id += 1;
        let id = QuestionId::new(guard.last_id);
        guard.rows.insert(id, record.into_question(id));
        Ok(id)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.get(&id).cloned())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.values().cloned().collect())
    }

    async fn list_questions_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .rows
            .values()
            .filter(|q| q.category() == category)
            .cloned()
            .collect())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

/// Aggregates category and question repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub categories: Arc<dyn CategoryRepository>,
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let categories: Arc<dyn CategoryRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo);
        Self {
            categories,
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, category: u64) -> NewQuestionRecord {
        NewQuestionRecord {
            question: text.to_owned(),
            answer: "A".to_owned(),
            category: CategoryId::new(category),
            difficulty: Difficulty::new(2).unwrap(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_in_insertion_order() {
        let repo = InMemoryRepository::new();
        let first = repo.insert_new_question(record("Q1", 1)).await.unwrap();
        let second = repo.insert_new_question(record("Q2", 2)).await.unwrap();
        assert_eq!(first, QuestionId::new(1));
        assert_eq!(second, QuestionId::new(2));

        let listed = repo.list_questions().await.unwrap();
        let texts: Vec<_> = listed.iter().map(Question::question).collect();
        assert_eq!(texts, vec!["Q1", "Q2"]);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let repo = InMemoryRepository::new();
        let first = repo.insert_new_question(record("Q1", 1)).await.unwrap();
        let second = repo.insert_new_question(record("Q2", 1)).await.unwrap();
        repo.delete_question(second).await.unwrap();

        let third = repo.insert_new_question(record("Q3", 1)).await.unwrap();
        assert_eq!(third, QuestionId::new(3));
        assert_ne!(third, first);
        assert!(repo.get_question(second).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_missing_question_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.delete_question(QuestionId::new(9)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn filters_questions_by_category() {
        let repo = InMemoryRepository::new();
        repo.insert_new_question(record("Q1", 1)).await.unwrap();
        repo.insert_new_question(record("Q2", 2)).await.unwrap();
        repo.insert_new_question(record("Q3", 1)).await.unwrap();

        let in_one = repo
            .list_questions_by_category(CategoryId::new(1))
            .await
            .unwrap();
        assert_eq!(in_one.len(), 2);
        assert!(in_one.iter().all(|q| q.category() == CategoryId::new(1)));
    }

    #[tokio::test]
    async fn upsert_rejects_blank_label() {
        let repo = InMemoryRepository::new();
        let blank = Category::from_stored(CategoryId::new(1), "  ".to_owned());
        let err = repo.upsert_category(&blank).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        assert!(repo.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upserts_and_lists_categories_by_id() {
        let repo = InMemoryRepository::new();
        repo.upsert_category(&Category::new(CategoryId::new(2), "Art").unwrap())
            .await
            .unwrap();
        repo.upsert_category(&Category::new(CategoryId::new(1), "Science").unwrap())
            .await
            .unwrap();
        repo.upsert_category(&Category::new(CategoryId::new(2), "Arts").unwrap())
            .await
            .unwrap();

        let listed = repo.list_categories().await.unwrap();
        let labels: Vec<_> = listed.iter().map(Category::label).collect();
        assert_eq!(labels, vec!["Science", "Arts"]);
        assert!(repo.get_category(CategoryId::new(3)).await.unwrap().is_none());
    }
}
