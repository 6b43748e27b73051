use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::model::{CategoryId, Question, QuestionId};

/// Which questions a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizScope {
    All,
    Category(CategoryId),
}

impl QuizScope {
    /// Raw category id that clients send to mean "all categories".
    pub const ALL_CATEGORIES: u64 = 0;

    /// Maps a client-supplied category id onto a scope; `0` is never a real category.
    #[must_use]
    pub fn from_raw(category_id: u64) -> Self {
        if category_id == Self::ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(CategoryId::new(category_id))
        }
    }

    #[must_use]
    pub fn category(&self) -> Option<CategoryId> {
        match self {
            Self::All => None,
            Self::Category(id) => Some(*id),
        }
    }

    #[must_use]
    pub fn includes(&self, question: &Question) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => question.category() == *id,
        }
    }
}

/// Outcome of a quiz draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPick<'a> {
    Question(&'a Question),
    /// Every eligible question has already been asked.
    Exhausted,
}

impl<'a> QuizPick<'a> {
    #[must_use]
    pub fn question(self) -> Option<&'a Question> {
        match self {
            Self::Question(q) => Some(q),
            Self::Exhausted => None,
        }
    }
}

/// Draws one question uniformly at random from `pool`, skipping `excluded`
/// ids and anything outside `scope`.
pub fn next_question<'a, R: Rng + ?Sized>(
    pool: &'a [Question],
    scope: QuizScope,
    excluded: &HashSet<QuestionId>,
    rng: &mut R,
) -> QuizPick<'a> {
    let candidates: Vec<&Question> = pool
        .iter()
        .filter(|q| !excluded.contains(&q.id()))
        .filter(|q| scope.includes(q))
        .collect();

    match candidates.choose(rng) {
        Some(q) => QuizPick::Question(q),
        None => QuizPick::Exhausted,
    }
}
