use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::model::ids::{CategoryId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("answer text cannot be empty")]
    EmptyAnswer,

    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u64),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty rating of a question, from 1 (easiest) to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns `QuestionError::InvalidDifficulty` outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, QuestionError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuestionError::InvalidDifficulty(u64::from(value)))
        }
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = QuestionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u64> for Difficulty {
    type Error = QuestionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| QuestionError::InvalidDifficulty(value))
            .and_then(Self::new)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Client-supplied payload for a new question.
///
/// Every field is optional so a partial payload still deserializes; presence
/// is checked by [`QuestionDraft::validate`]. Numeric fields also accept
/// numeric strings, which is what HTML form selects submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub category: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub difficulty: Option<u64>,
}

impl QuestionDraft {
    /// # Errors
    ///
    /// Returns `QuestionError` when a field is missing, blank or out of range.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionError> {
        let question = self
            .question
            .ok_or(QuestionError::MissingField("question"))?;
        if question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        let answer = self.answer.ok_or(QuestionError::MissingField("answer"))?;
        if answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        let category = self
            .category
            .map(CategoryId::new)
            .ok_or(QuestionError::MissingField("category"))?;
        let difficulty = self
            .difficulty
            .ok_or(QuestionError::MissingField("difficulty"))
            .and_then(Difficulty::try_from)?;

        Ok(ValidatedQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

/// Deserializes an optional integer given either as a number or a numeric string.
///
/// # Errors
///
/// Fails on any other JSON type or a non-numeric string.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}

/// A question that passed validation but has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: Difficulty,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

/// A single trivia item.
///
/// Serialized as `{"id", "question", "answer", "category", "difficulty"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    question: String,
    answer: String,
    category: CategoryId,
    difficulty: Difficulty,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        question: impl Into<String>,
        answer: impl Into<String>,
        category: CategoryId,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            category,
            difficulty,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
