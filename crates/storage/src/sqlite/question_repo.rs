use trivia_core::model::{CategoryId, Question, QuestionId};

use super::mapping::{
    category_id_to_i64, map_question_row, question_id_from_i64, stored_category_key,
    stored_question_key,
};
use super::{SqliteRepository, storage_error};
use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn insert_new_question(
        &self,
        record: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO questions (question, answer, category, difficulty)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(record.question)
        .bind(record.answer)
        .bind(category_id_to_i64(record.category)?)
        .bind(i64::from(record.difficulty.value()))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        question_id_from_i64(res.last_insert_rowid())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let Some(key) = stored_question_key(id) else {
            return Ok(None);
        };
        let row = sqlx::query(
            r"
            SELECT id, question, answer, category, difficulty
            FROM questions WHERE id = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        match row {
            Some(row) => map_question_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question, answer, category, difficulty
            FROM questions
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(&row)?);
        }
        Ok(questions)
    }

    async fn list_questions_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Question>, StorageError> {
        let Some(key) = stored_category_key(category) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            r"
            SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE category = ?1
            ORDER BY id ASC
            ",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(&row)?);
        }
        Ok(questions)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError> {
        let key = stored_question_key(id).ok_or(StorageError::NotFound)?;
        let res = sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
