//! Structured results returned by the question services.
//!
//! Field names match what trivia clients already read, so the transport can
//! serialize these as-is.

use serde::{Deserialize, Serialize};

use trivia_core::model::{Category, CategoryMap, Question, QuestionDraft, QuestionId};
use trivia_core::quiz::QuizPick;

/// A page of all questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionListing {
    pub questions: Vec<Question>,
    /// Count of every stored question, not just this page.
    pub total_questions: usize,
    pub categories: CategoryMap,
    pub current_category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedQuestion {
    pub deleted: QuestionId,
    #[serde(flatten)]
    pub listing: QuestionListing,
}

/// A page of search matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub questions: Vec<Question>,
    /// Count of every match, not just this page.
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedQuestion {
    pub created: QuestionId,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: CategoryMap,
}

/// Result of the combined create-or-search entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CreateOrSearch {
    Created(CreatedQuestion),
    Searched(SearchResults),
}

/// A page of one category's questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryQuestions {
    pub questions: Vec<Question>,
    /// Count of every question in the category.
    pub total_questions: usize,
    /// Label of the requested category.
    pub current_category: String,
}

/// Next quiz question, or `{"question": null, "empty": true}` once exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
}

impl QuizQuestion {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.question.is_none()
    }
}

impl From<QuizPick<'_>> for QuizQuestion {
    fn from(pick: QuizPick<'_>) -> Self {
        match pick {
            QuizPick::Question(q) => Self {
                question: Some(q.clone()),
                empty: None,
            },
            QuizPick::Exhausted => Self {
                question: None,
                empty: Some(true),
            },
        }
    }
}

/// Body of the combined create-or-search request.
///
/// A non-empty `searchTerm` selects search; otherwise the remaining fields
/// describe the question to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionPayload {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
    #[serde(flatten)]
    pub draft: QuestionDraft,
}
