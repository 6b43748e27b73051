use std::collections::HashSet;

use serde::Deserialize;

use trivia_core::model::{QuestionId, lenient_u64};
use trivia_core::quiz::QuizScope;

use crate::error::QuestionServiceError;

/// Category object sent by quiz clients: `{"id": 0, "type": "click"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuizCategoryRef {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: Option<u64>,
    #[serde(rename = "type", default)]
    pub label: Option<String>,
}

/// Body of a "next quiz question" request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub quiz_category: Option<QuizCategoryRef>,
    #[serde(default)]
    pub previous_questions: Option<Vec<QuestionId>>,
}

impl QuizRequest {
    #[must_use]
    pub fn new(category_id: u64, previous_questions: impl IntoIterator<Item = QuestionId>) -> Self {
        Self {
            quiz_category: Some(QuizCategoryRef {
                id: Some(category_id),
                label: None,
            }),
            previous_questions: Some(previous_questions.into_iter().collect()),
        }
    }

    /// Parses a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::BadRequest` if the body does not have the
    /// expected shape.
    pub fn from_json(body: serde_json::Value) -> Result<Self, QuestionServiceError> {
        serde_json::from_value(body).map_err(|e| QuestionServiceError::bad_request(e.to_string()))
    }

    /// Splits the request into the quiz scope and the exclusion set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::BadRequest` if the category, its id, or
    /// the previous questions are missing.
    pub fn into_parts(self) -> Result<(QuizScope, HashSet<QuestionId>), QuestionServiceError> {
        let category = self
            .quiz_category
            .ok_or_else(|| QuestionServiceError::bad_request("missing quiz_category"))?;
        let category_id = category
            .id
            .ok_or_else(|| QuestionServiceError::bad_request("missing quiz_category.id"))?;
        let previous = self
            .previous_questions
            .ok_or_else(|| QuestionServiceError::bad_request("missing previous_questions"))?;

        Ok((
            QuizScope::from_raw(category_id),
            previous.into_iter().collect(),
        ))
    }
}
