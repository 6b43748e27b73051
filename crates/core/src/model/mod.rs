mod category;
mod ids;
mod question;

pub use ids::{CategoryId, ParseIdError, QuestionId};

pub use category::{Category, CategoryError, CategoryMap, category_map};
pub use question::{
    Difficulty, Question, QuestionDraft, QuestionError, ValidatedQuestion, lenient_u64,
};
