use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use trivia_core::model::{Question, QuestionId};
use trivia_core::quiz::{QuizPick, QuizScope, next_question};

/// Random source handed to the quiz selector.
///
/// `Thread` draws from the thread-local generator; `Seeded` replays a fixed
/// sequence and is shared between clones of the owning service.
#[derive(Debug, Clone, Default)]
pub enum RngSource {
    #[default]
    Thread,
    Seeded(Arc<Mutex<StdRng>>),
}

impl RngSource {
    #[must_use]
    pub fn thread() -> Self {
        Self::Thread
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    /// Draws the next quiz question with this source.
    pub fn pick<'a>(
        &self,
        pool: &'a [Question],
        scope: QuizScope,
        excluded: &HashSet<QuestionId>,
    ) -> QuizPick<'a> {
        match self {
            Self::Thread => next_question(pool, scope, excluded, &mut rand::rng()),
            Self::Seeded(rng) => {
                let mut guard = rng.lock().unwrap_or_else(PoisonError::into_inner);
                next_question(pool, scope, excluded, &mut *guard)
            }
        }
    }
}
