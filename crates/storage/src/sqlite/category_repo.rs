use trivia_core::model::{Category, CategoryId};

use super::mapping::{category_id_to_i64, map_category_row, stored_category_key};
use super::{SqliteRepository, storage_error};
use crate::repository::{CategoryRepository, StorageError};

#[async_trait::async_trait]
impl CategoryRepository for SqliteRepository {
    async fn upsert_category(&self, category: &Category) -> Result<(), StorageError> {
        category
            .check()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        sqlx::query(
            r"
            INSERT INTO categories (id, type)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                type = excluded.type
            ",
        )
        .bind(category_id_to_i64(category.id())?)
        .bind(category.label().to_owned())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        let Some(key) = stored_category_key(id) else {
            return Ok(None);
        };
        let row = sqlx::query(
            r"
            SELECT id, type
            FROM categories WHERE id = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        match row {
            Some(row) => map_category_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, type
            FROM categories
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in rows {
            categories.push(map_category_row(&row)?);
        }
        Ok(categories)
    }
}
