use trivia_core::model::CategoryId;

/// Category reported as `current_category` by question listings.
///
/// A fixed convention shared with clients, not derived from the data: the
/// category with this id must exist for listings to succeed.
pub const DEFAULT_CURRENT_CATEGORY: CategoryId = CategoryId::new(1);

/// Tunables for `QuestionService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionServiceConfig {
    /// Category returned as `current_category` by list and delete.
    pub current_category: CategoryId,
    /// When set, any failure while listing a category's questions is reported
    /// as not-found. Clear it to surface storage failures as internal errors.
    pub coarse_category_errors: bool,
}

impl Default for QuestionServiceConfig {
    fn default() -> Self {
        Self {
            current_category: DEFAULT_CURRENT_CATEGORY,
            coarse_category_errors: true,
        }
    }
}
