#![forbid(unsafe_code)]

pub mod model;
pub mod pagination;
pub mod quiz;
pub mod search;

pub use pagination::{PageNumber, QUESTIONS_PER_PAGE, paginate};
pub use quiz::{QuizPick, QuizScope, next_question};
pub use search::{SearchTerm, search};
