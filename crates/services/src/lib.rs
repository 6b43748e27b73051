#![forbid(unsafe_code)]

pub mod app_services;
pub mod category_service;
pub mod config;
pub mod error;
pub mod payload;
pub mod question_service;
pub mod quiz;
pub mod rng;

pub use app_services::AppServices;
pub use category_service::CategoryService;
pub use config::{DEFAULT_CURRENT_CATEGORY, QuestionServiceConfig};
pub use error::{AppServicesError, ErrorBody, ErrorKind, OperationError, QuestionServiceError};
pub use payload::{
    CategoryQuestions, CreateOrSearch, CreatedQuestion, DeletedQuestion, QuestionListing,
    QuestionPayload, QuizQuestion, SearchResults,
};
pub use question_service::QuestionService;
pub use quiz::{QuizCategoryRef, QuizRequest};
pub use rng::RngSource;
