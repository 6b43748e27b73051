use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use trivia_core::model::{Category, CategoryId, Difficulty, Question, QuestionId};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

/// Key for looking up a stored question; ids beyond `i64::MAX` cannot be stored.
pub(crate) fn stored_question_key(id: QuestionId) -> Option<i64> {
    i64::try_from(id.value()).ok()
}

pub(crate) fn category_id_from_i64(v: i64) -> Result<CategoryId, StorageError> {
    Ok(CategoryId::new(i64_to_u64("category_id", v)?))
}

pub(crate) fn category_id_to_i64(id: CategoryId) -> Result<i64, StorageError> {
    u64_to_i64("category_id", id.value())
}

/// Key for looking up a stored category; ids beyond `i64::MAX` cannot be stored.
pub(crate) fn stored_category_key(id: CategoryId) -> Option<i64> {
    i64::try_from(id.value()).ok()
}

pub(crate) fn difficulty_from_i64(v: i64) -> Result<Difficulty, StorageError> {
    Difficulty::try_from(i64_to_u64("difficulty", v)?).map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    Ok(Question::new(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("question").map_err(ser)?,
        row.try_get::<String, _>("answer").map_err(ser)?,
        category_id_from_i64(row.try_get::<i64, _>("category").map_err(ser)?)?,
        difficulty_from_i64(row.try_get::<i64, _>("difficulty").map_err(ser)?)?,
    ))
}

pub(crate) fn map_category_row(row: &SqliteRow) -> Result<Category, StorageError> {
    Ok(Category::from_stored(
        category_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("type").map_err(ser)?,
    ))
}
