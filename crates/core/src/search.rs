use crate::model::Question;

/// A non-empty, case-insensitive search term.
///
/// An empty term means "no search"; callers take the non-search path instead,
/// so there is no way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Returns `None` for an empty term.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return None;
        }
        let folded = raw.to_lowercase();
        Some(Self { raw, folded })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Case-insensitive substring test.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.folded)
    }
}

/// Questions whose text contains `term`, in corpus order.
#[must_use]
pub fn search<'a>(corpus: &'a [Question], term: &SearchTerm) -> Vec<&'a Question> {
    corpus
        .iter()
        .filter(|q| term.matches(q.question()))
        .collect()
}
