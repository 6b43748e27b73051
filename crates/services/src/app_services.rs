use std::sync::Arc;

use storage::repository::Storage;

use crate::category_service::CategoryService;
use crate::config::QuestionServiceConfig;
use crate::error::AppServicesError;
use crate::question_service::QuestionService;
use crate::rng::RngSource;

/// Assembles the category and question services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    category_service: Arc<CategoryService>,
    question_service: Arc<QuestionService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: QuestionServiceConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::info!(
            current_category = %config.current_category,
            coarse_category_errors = config.coarse_category_errors,
            "question services ready"
        );
        Ok(Self::from_storage(&storage, config, RngSource::default()))
    }

    /// Build services over an already opened storage backend.
    #[must_use]
    pub fn from_storage(storage: &Storage, config: QuestionServiceConfig, rng: RngSource) -> Self {
        let category_service = CategoryService::new(Arc::clone(&storage.categories));
        let question_service = QuestionService::new(
            config,
            category_service.clone(),
            Arc::clone(&storage.questions),
        )
        .with_rng(rng);

        Self {
            category_service: Arc::new(category_service),
            question_service: Arc::new(question_service),
        }
    }

    #[must_use]
    pub fn category_service(&self) -> Arc<CategoryService> {
        Arc::clone(&self.category_service)
    }

    #[must_use]
    pub fn question_service(&self) -> Arc<QuestionService> {
        Arc::clone(&self.question_service)
    }
}
