use std::sync::Arc;

use storage::repository::{NewQuestionRecord, QuestionRepository, StorageError};
use trivia_core::model::{CategoryId, Question, QuestionDraft, QuestionId};
use trivia_core::pagination::{PageNumber, paginate};
use trivia_core::search::{SearchTerm, search};

use crate::category_service::CategoryService;
use crate::config::QuestionServiceConfig;
use crate::error::{OperationError, QuestionServiceError};
use crate::payload::{
    CategoryQuestions, CreateOrSearch, CreatedQuestion, DeletedQuestion, QuestionListing,
    QuestionPayload, QuizQuestion, SearchResults,
};
use crate::quiz::QuizRequest;
use crate::rng::RngSource;

/// Listing, search, creation, deletion and quiz draws over the question bank.
///
/// Holds no state between calls beyond its repository handles; every
/// operation reads fresh from storage.
#[derive(Clone)]
pub struct QuestionService {
    config: QuestionServiceConfig,
    rng: RngSource,
    categories: CategoryService,
    questions: Arc<dyn QuestionRepository>,
}

fn page_of(questions: &[Question], page: PageNumber) -> Vec<Question> {
    paginate(questions, page).to_vec()
}

impl QuestionService {
    #[must_use]
    pub fn new(
        config: QuestionServiceConfig,
        categories: CategoryService,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            config,
            rng: RngSource::default(),
            categories,
            questions,
        }
    }

    /// Replace the random source used by quiz draws.
    #[must_use]
    pub fn with_rng(mut self, rng: RngSource) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn config(&self) -> &QuestionServiceConfig {
        &self.config
    }

    /// One page of all questions with the category index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::NotFound` when there are no questions.
    /// Returns `QuestionServiceError::Internal` if repository access fails or
    /// the configured current category is missing.
    pub async fn list(&self, page: PageNumber) -> Result<QuestionListing, QuestionServiceError> {
        tracing::debug!(page = page.get(), "listing questions");
        let questions = self
            .questions
            .list_questions()
            .await
            .map_err(QuestionServiceError::internal)?;
        if questions.is_empty() {
            return Err(QuestionServiceError::not_found("no questions available"));
        }
        self.listing(&questions, page).await.map_err(|e| {
            tracing::warn!(error = %e, "question listing failed");
            QuestionServiceError::Internal(e)
        })
    }

    /// Delete a question, then list `page` of what remains.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::NotFound` if the question does not exist,
    /// including when it was already deleted.
    /// Returns `QuestionServiceError::Unprocessable` for any other failure.
    pub async fn delete(
        &self,
        id: QuestionId,
        page: PageNumber,
    ) -> Result<DeletedQuestion, QuestionServiceError> {
        tracing::debug!(question_id = %id, page = page.get(), "deleting question");
        match self.try_delete(id, page).await {
            Ok(Some(deleted)) => {
                tracing::info!(question_id = %id, "question deleted");
                Ok(deleted)
            }
            Ok(None) | Err(OperationError::Storage(StorageError::NotFound)) => Err(
                QuestionServiceError::not_found(format!("question {id} does not exist")),
            ),
            Err(e) => {
                tracing::warn!(question_id = %id, error = %e, "question delete failed");
                Err(QuestionServiceError::Unprocessable(e))
            }
        }
    }

    /// Search when the payload carries a non-empty `searchTerm`, create otherwise.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Unprocessable` if the search or the
    /// creation fails.
    pub async fn create_or_search(
        &self,
        payload: QuestionPayload,
        page: PageNumber,
    ) -> Result<CreateOrSearch, QuestionServiceError> {
        match payload.search_term.and_then(SearchTerm::new) {
            Some(term) => self.search(&term, page).await.map(CreateOrSearch::Searched),
            None => self
                .create(payload.draft, page)
                .await
                .map(CreateOrSearch::Created),
        }
    }

    /// [`Self::create_or_search`] for a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Unprocessable` if the body cannot be
    /// decoded, or if the search or the creation fails.
    pub async fn create_or_search_json(
        &self,
        body: serde_json::Value,
        page: PageNumber,
    ) -> Result<CreateOrSearch, QuestionServiceError> {
        let payload: QuestionPayload = serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, "question payload rejected");
            QuestionServiceError::unprocessable(e)
        })?;
        self.create_or_search(payload, page).await
    }

    /// Case-insensitive substring search over question text.
    ///
    /// `total_questions` counts every match, not just the returned page.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Unprocessable` if repository access fails.
    pub async fn search(
        &self,
        term: &SearchTerm,
        page: PageNumber,
    ) -> Result<SearchResults, QuestionServiceError> {
        tracing::debug!(term = term.as_str(), page = page.get(), "searching questions");
        let corpus = self.questions.list_questions().await.map_err(|e| {
            tracing::warn!(error = %e, "question search failed");
            QuestionServiceError::unprocessable(e)
        })?;
        let matches: Vec<&Question> = search(&corpus, term);

        Ok(SearchResults {
            questions: paginate(&matches, page).iter().map(|q| (*q).clone()).collect(),
            total_questions: matches.len(),
        })
    }

    /// Validate and store a new question, then list `page` of all questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Unprocessable` if the draft is incomplete
    /// or invalid, or if persistence fails.
    pub async fn create(
        &self,
        draft: QuestionDraft,
        page: PageNumber,
    ) -> Result<CreatedQuestion, QuestionServiceError> {
        self.try_create(draft, page).await.map_err(|e| {
            tracing::warn!(error = %e, "question create failed");
            QuestionServiceError::Unprocessable(e)
        })
    }

    /// One page of the questions in a category.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::NotFound` if the category does not exist.
    /// Other failures are also `NotFound` while `coarse_category_errors` is
    /// set, and `QuestionServiceError::Internal` otherwise.
    pub async fn list_by_category(
        &self,
        category: CategoryId,
        page: PageNumber,
    ) -> Result<CategoryQuestions, QuestionServiceError> {
        tracing::debug!(category_id = %category, page = page.get(), "listing category questions");
        match self.try_list_by_category(category, page).await {
            Ok(Some(listing)) => Ok(listing),
            Ok(None) => Err(QuestionServiceError::not_found(format!(
                "category {category} does not exist"
            ))),
            Err(e) => {
                tracing::warn!(category_id = %category, error = %e, "category listing failed");
                if self.config.coarse_category_errors {
                    Err(QuestionServiceError::not_found(format!(
                        "questions for category {category}"
                    )))
                } else {
                    Err(QuestionServiceError::Internal(e))
                }
            }
        }
    }

    /// Draw a random question not yet asked in this quiz.
    ///
    /// Returns `{"question": null, "empty": true}` once every eligible question
    /// has been asked.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::BadRequest` for a malformed request.
    /// Returns `QuestionServiceError::Internal` if repository access fails.
    pub async fn next_quiz_question(
        &self,
        request: QuizRequest,
    ) -> Result<QuizQuestion, QuestionServiceError> {
        let (scope, excluded) = request.into_parts()?;
        tracing::debug!(?scope, asked = excluded.len(), "drawing quiz question");

        let pool = match scope.category() {
            None => self.questions.list_questions().await,
            Some(category) => self.questions.list_questions_by_category(category).await,
        }
        .map_err(|e| {
            tracing::warn!(error = %e, "quiz pool lookup failed");
            QuestionServiceError::internal(e)
        })?;

        let quiz = QuizQuestion::from(self.rng.pick(&pool, scope, &excluded));
        if quiz.is_exhausted() {
            tracing::debug!(?scope, "quiz exhausted");
        }
        Ok(quiz)
    }

    /// [`Self::next_quiz_question`] for a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::BadRequest` if the body is malformed.
    /// Returns `QuestionServiceError::Internal` if repository access fails.
    pub async fn next_quiz_question_json(
        &self,
        body: serde_json::Value,
    ) -> Result<QuizQuestion, QuestionServiceError> {
        let request = QuizRequest::from_json(body)?;
        self.next_quiz_question(request).await
    }

    async fn listing(
        &self,
        questions: &[Question],
        page: PageNumber,
    ) -> Result<QuestionListing, OperationError> {
        let categories = self.categories.category_map().await?;
        let current_category = self
            .categories
            .default_category(self.config.current_category)
            .await?;

        Ok(QuestionListing {
            questions: page_of(questions, page),
            total_questions: questions.len(),
            categories,
            current_category,
        })
    }

    async fn try_delete(
        &self,
        id: QuestionId,
        page: PageNumber,
    ) -> Result<Option<DeletedQuestion>, OperationError> {
        let Some(question) = self.questions.get_question(id).await? else {
            return Ok(None);
        };
        self.questions.delete_question(question.id()).await?;

        let remaining = self.questions.list_questions().await?;
        let listing = self.listing(&remaining, page).await?;
        Ok(Some(DeletedQuestion {
            deleted: question.id(),
            listing,
        }))
    }

    async fn try_create(
        &self,
        draft: QuestionDraft,
        page: PageNumber,
    ) -> Result<CreatedQuestion, OperationError> {
        let validated = draft.validate()?;
        let created = self
            .questions
            .insert_new_question(NewQuestionRecord::from_validated(validated))
            .await?;
        tracing::info!(question_id = %created, "question created");

        let questions = self.questions.list_questions().await?;
        let categories = self.categories.category_map().await?;

        Ok(CreatedQuestion {
            created,
            questions: page_of(&questions, page),
            total_questions: questions.len(),
            categories,
        })
    }

    async fn try_list_by_category(
        &self,
        category: CategoryId,
        page: PageNumber,
    ) -> Result<Option<CategoryQuestions>, OperationError> {
        let Some(category) = self.categories.get_category(category).await? else {
            return Ok(None);
        };
        let questions = self
            .questions
            .list_questions_by_category(category.id())
            .await?;

        Ok(Some(CategoryQuestions {
            questions: page_of(&questions, page),
            total_questions: questions.len(),
            current_category: category.label().to_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::json;
    use storage::repository::{CategoryRepository, InMemoryRepository};
    use trivia_core::model::Category;

    use crate::error::ErrorKind;

    fn page(n: u32) -> PageNumber {
        PageNumber::new(n).unwrap()
    }

    fn draft(text: &str, category: u64) -> QuestionDraft {
        QuestionDraft {
            question: Some(text.to_owned()),
            answer: Some("answer".to_owned()),
            category: Some(category),
            difficulty: Some(2),
        }
    }

    async fn seed_categories(repo: &InMemoryRepository) {
        for (id, label) in [(1, "Science"), (2, "Art"), (3, "Geography")] {
            repo.upsert_category(&Category::new(CategoryId::new(id), label).unwrap())
                .await
                .unwrap();
        }
    }

    async fn seed_questions(repo: &InMemoryRepository, texts: &[(&str, u64)]) {
        for (text, category) in texts {
            let validated = draft(text, *category).validate().unwrap();
            repo.insert_new_question(NewQuestionRecord::from_validated(validated))
                .await
                .unwrap();
        }
    }

    fn service_over(repo: &InMemoryRepository, config: QuestionServiceConfig) -> QuestionService {
        QuestionService::new(
            config,
            CategoryService::new(Arc::new(repo.clone())),
            Arc::new(repo.clone()),
        )
        .with_rng(RngSource::seeded(17))
    }

    async fn twelve_in_geography() -> (InMemoryRepository, QuestionService) {
        let repo = InMemoryRepository::new();
        seed_categories(&repo).await;
        let texts: Vec<String> = (1..=12).map(|i| format!("Question {i}")).collect();
        let rows: Vec<(&str, u64)> = texts.iter().map(|t| (t.as_str(), 3)).collect();
        seed_questions(&repo, &rows).await;
        let service = service_over(&repo, QuestionServiceConfig::default());
        (repo, service)
    }

    fn ids(questions: &[Question]) -> Vec<u64> {
        questions.iter().map(|q| q.id().value()).collect()
    }

    #[tokio::test]
    async fn second_page_of_twelve_returns_last_two() {
        let (_, service) = twelve_in_geography().await;
        let listing = service.list(page(2)).await.unwrap();
        assert_eq!(ids(&listing.questions), vec![11, 12]);
        assert_eq!(listing.total_questions, 12);
        assert_eq!(listing.categories.len(), 3);
        assert_eq!(listing.current_category.id(), CategoryId::new(1));
        assert_eq!(listing.current_category.label(), "Science");
    }

    #[tokio::test]
    async fn page_past_end_is_empty_but_counts_everything() {
        let (_, service) = twelve_in_geography().await;
        let listing = service.list(page(5)).await.unwrap();
        assert!(listing.questions.is_empty());
        assert_eq!(listing.total_questions, 12);
    }

    #[tokio::test]
    async fn list_without_questions_is_not_found() {
        let repo = InMemoryRepository::new();
        seed_categories(&repo).await;
        let service = service_over(&repo, QuestionServiceConfig::default());
        let err = service.list(PageNumber::FIRST).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn list_without_default_category_is_internal() {
        let repo = InMemoryRepository::new();
        seed_questions(&repo, &[("Q", 2)]).await;
        let service = service_over(&repo, QuestionServiceConfig::default());
        let err = service.list(PageNumber::FIRST).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(matches!(
            err,
            QuestionServiceError::Internal(OperationError::MissingDefaultCategory(_))
        ));
    }

    #[tokio::test]
    async fn current_category_follows_config() {
        let (repo, _) = twelve_in_geography().await;
        let config = QuestionServiceConfig {
            current_category: CategoryId::new(2),
            ..QuestionServiceConfig::default()
        };
        let listing = service_over(&repo, config)
            .list(PageNumber::FIRST)
            .await
            .unwrap();
        assert_eq!(listing.current_category.label(), "Art");
    }

    #[tokio::test]
    async fn delete_removes_question_everywhere() {
        let (repo, service) = twelve_in_geography().await;
        let deleted = service
            .delete(QuestionId::new(5), PageNumber::FIRST)
            .await
            .unwrap();
        assert_eq!(deleted.deleted, QuestionId::new(5));
        assert_eq!(deleted.listing.total_questions, 11);
        assert!(!ids(&deleted.listing.questions).contains(&5));
        assert_eq!(deleted.listing.current_category.id(), CategoryId::new(1));

        assert!(repo.get_question(QuestionId::new(5)).await.unwrap().is_none());

        let listing = service.list(page(1)).await.unwrap();
        assert!(!ids(&listing.questions).contains(&5));
        let found = service
            .search(&SearchTerm::new("Question 5").unwrap(), PageNumber::FIRST)
            .await
            .unwrap();
        assert_eq!(found.total_questions, 0);
    }

    #[tokio::test]
    async fn repeated_delete_is_not_found() {
        let (_, service) = twelve_in_geography().await;
        service
            .delete(QuestionId::new(3), PageNumber::FIRST)
            .await
            .unwrap();
        let err = service
            .delete(QuestionId::new(3), PageNumber::FIRST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn deleting_the_last_question_still_lists() {
        let repo = InMemoryRepository::new();
        seed_categories(&repo).await;
        seed_questions(&repo, &[("Only one", 1)]).await;
        let service = service_over(&repo, QuestionServiceConfig::default());

        let deleted = service
            .delete(QuestionId::new(1), PageNumber::FIRST)
            .await
            .unwrap();
        assert_eq!(deleted.listing.total_questions, 0);
        assert!(deleted.listing.questions.is_empty());
    }

    #[tokio::test]
    async fn delete_with_missing_default_category_is_unprocessable() {
        let repo = InMemoryRepository::new();
        seed_questions(&repo, &[("Q", 2)]).await;
        let service = service_over(&repo, QuestionServiceConfig::default());
        let err = service
            .delete(QuestionId::new(1), PageNumber::FIRST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
    }

    #[tokio::test]
    async fn search_returns_match_total_not_global_total() {
        let repo = InMemoryRepository::new();
        seed_categories(&repo).await;
        seed_questions(
            &repo,
            &[
                ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", 4),
                ("What is the Title of X?", 1),
                ("Who discovered penicillin?", 1),
            ],
        )
        .await;
        let service = service_over(&repo, QuestionServiceConfig::default());

        let outcome = service
            .create_or_search(
                QuestionPayload {
                    search_term: Some("TITLE".to_owned()),
                    ..QuestionPayload::default()
                },
                PageNumber::FIRST,
            )
            .await
            .unwrap();
        let CreateOrSearch::Searched(results) = outcome else {
            panic!("expected search results");
        };
        assert_eq!(ids(&results.questions), vec![1, 2]);
        assert_eq!(results.total_questions, 2);
    }

    #[tokio::test]
    async fn search_paginates_matches() {
        let (_, service) = twelve_in_geography().await;
        let term = SearchTerm::new("question").unwrap();

        let first = service.search(&term, page(1)).await.unwrap();
        assert_eq!(first.questions.len(), 10);
        assert_eq!(first.total_questions, 12);

        let second = service.search(&term, page(2)).await.unwrap();
        assert_eq!(ids(&second.questions), vec![11, 12]);
    }

    #[tokio::test]
    async fn empty_search_term_creates_instead() {
        let (_, service) = twelve_in_geography().await;
        let payload: QuestionPayload = serde_json::from_value(json!({
            "searchTerm": "",
            "question": "Which planet is largest?",
            "answer": "Jupiter",
            "category": "1",
            "difficulty": 1
        }))
        .unwrap();

        let outcome = service
            .create_or_search(payload, page(2))
            .await
            .unwrap();
        let CreateOrSearch::Created(created) = outcome else {
            panic!("expected a created question");
        };
        assert_eq!(created.created, QuestionId::new(13));
        assert_eq!(created.total_questions, 13);
        assert_eq!(ids(&created.questions), vec![11, 12, 13]);
        assert_eq!(created.categories.len(), 3);
    }

    #[tokio::test]
    async fn undecodable_create_body_is_unprocessable() {
        let (repo, service) = twelve_in_geography().await;
        let err = service
            .create_or_search_json(
                json!({
                    "question": "Typed wrong?",
                    "answer": "Yes",
                    "category": 1,
                    "difficulty": true
                }),
                PageNumber::FIRST,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
        assert!(matches!(
            err,
            QuestionServiceError::Unprocessable(OperationError::MalformedPayload(_))
        ));
        assert_eq!(repo.list_questions().await.unwrap().len(), 12);

        let outcome = service
            .create_or_search_json(json!({ "searchTerm": "question 1" }), PageNumber::FIRST)
            .await
            .unwrap();
        assert!(matches!(outcome, CreateOrSearch::Searched(r) if r.total_questions == 4));
    }

    #[tokio::test]
    async fn incomplete_create_is_unprocessable_and_stores_nothing() {
        let (repo, service) = twelve_in_geography().await;
        let payload: QuestionPayload =
            serde_json::from_value(json!({ "question": "No answer given" })).unwrap();

        let err = service
            .create_or_search(payload, PageNumber::FIRST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
        assert_eq!(repo.list_questions().await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn created_ids_are_not_reused_after_delete() {
        let (_, service) = twelve_in_geography().await;
        service
            .delete(QuestionId::new(12), PageNumber::FIRST)
            .await
            .unwrap();
        let created = service
            .create(draft("Fresh", 2), PageNumber::FIRST)
            .await
            .unwrap();
        assert_eq!(created.created, QuestionId::new(13));
    }

    #[tokio::test]
    async fn list_by_category_counts_whole_category() {
        let repo = InMemoryRepository::new();
        seed_categories(&repo).await;
        let texts: Vec<String> = (1..=14).map(|i| format!("Q{i}")).collect();
        let rows: Vec<(&str, u64)> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), if i < 11 { 2 } else { 1 }))
            .collect();
        seed_questions(&repo, &rows).await;
        let service = service_over(&repo, QuestionServiceConfig::default());

        let art = service
            .list_by_category(CategoryId::new(2), page(2))
            .await
            .unwrap();
        assert_eq!(ids(&art.questions), vec![11]);
        assert_eq!(art.total_questions, 11);
        assert_eq!(art.current_category, "Art");

        let geography = service
            .list_by_category(CategoryId::new(3), PageNumber::FIRST)
            .await
            .unwrap();
        assert!(geography.questions.is_empty());
        assert_eq!(geography.total_questions, 0);
        assert_eq!(geography.current_category, "Geography");
    }

    #[tokio::test]
    async fn list_by_missing_category_is_not_found() {
        let (_, service) = twelve_in_geography().await;
        let err = service
            .list_by_category(CategoryId::new(99), PageNumber::FIRST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn quiz_draws_unseen_question_in_category() {
        let repo = InMemoryRepository::new();
        seed_categories(&repo).await;
        seed_questions(&repo, &[("A", 1), ("B", 2), ("C", 1), ("D", 1)]).await;
        let service = service_over(&repo, QuestionServiceConfig::default());

        let mut asked = Vec::new();
        loop {
            let quiz = service
                .next_quiz_question(QuizRequest::new(1, asked.iter().copied()))
                .await
                .unwrap();
            let Some(question) = quiz.question else {
                assert_eq!(quiz.empty, Some(true));
                break;
            };
            assert_eq!(question.category(), CategoryId::new(1));
            assert!(!asked.contains(&question.id()));
            asked.push(question.id());
        }
        asked.sort();
        assert_eq!(
            asked,
            vec![QuestionId::new(1), QuestionId::new(3), QuestionId::new(4)]
        );
    }

    #[tokio::test]
    async fn quiz_over_all_categories_exhausts() {
        let repo = InMemoryRepository::new();
        seed_categories(&repo).await;
        seed_questions(&repo, &[("A", 1), ("B", 2), ("C", 3)]).await;
        let service = service_over(&repo, QuestionServiceConfig::default());

        let quiz = service
            .next_quiz_question_json(json!({
                "quiz_category": { "type": "click", "id": 0 },
                "previous_questions": [1, 2, 3]
            }))
            .await
            .unwrap();
        assert!(quiz.is_exhausted());
        assert_eq!(quiz.empty, Some(true));

        let quiz = service
            .next_quiz_question_json(json!({
                "quiz_category": { "type": "click", "id": 0 },
                "previous_questions": [1, 3]
            }))
            .await
            .unwrap();
        assert_eq!(quiz.question.map(|q| q.id()), Some(QuestionId::new(2)));
    }

    #[tokio::test]
    async fn malformed_quiz_request_is_bad_request() {
        let (_, service) = twelve_in_geography().await;
        let err = service
            .next_quiz_question_json(json!({ "previous_questions": [] }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = service
            .next_quiz_question_json(json!({
                "quiz_category": { "id": 1 },
                "previous_questions": { "1": true }
            }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    /// Category store whose listing always fails.
    struct BrokenCategories;

    #[async_trait]
    impl CategoryRepository for BrokenCategories {
        async fn upsert_category(&self, _category: &Category) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn get_category(&self, _id: CategoryId) -> Result<Option<Category>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    fn broken_service(config: QuestionServiceConfig) -> QuestionService {
        QuestionService::new(
            config,
            CategoryService::new(Arc::new(BrokenCategories)),
            Arc::new(InMemoryRepository::new()),
        )
    }

    #[tokio::test]
    async fn category_listing_failures_are_coarse_by_default() {
        let service = broken_service(QuestionServiceConfig::default());
        let err = service
            .list_by_category(CategoryId::new(1), PageNumber::FIRST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn category_listing_failures_surface_when_strict() {
        let service = broken_service(QuestionServiceConfig {
            coarse_category_errors: false,
            ..QuestionServiceConfig::default()
        });
        let err = service
            .list_by_category(CategoryId::new(1), PageNumber::FIRST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn create_with_broken_categories_is_unprocessable() {
        let service = broken_service(QuestionServiceConfig::default());
        let err = service
            .create(draft("Q", 1), PageNumber::FIRST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
    }
}
