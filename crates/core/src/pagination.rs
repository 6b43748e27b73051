use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of questions served per page.
pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageError {
    #[error("page numbers start at 1")]
    Zero,
    #[error("invalid page number: {0}")]
    Invalid(String),
}

/// One-based page index. Defaults to the first page.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Returns `None` for zero.
    #[must_use]
    pub fn new(page: u32) -> Option<Self> {
        NonZeroU32::new(page).map(Self)
    }

    #[must_use]
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Debug for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageNumber({})", self.0)
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PageError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PageError::Zero)
    }
}

impl From<PageNumber> for u32 {
    fn from(page: PageNumber) -> Self {
        page.get()
    }
}

impl FromStr for PageNumber {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u32>()
            .map_err(|_| PageError::Invalid(s.to_owned()))?;
        Self::try_from(raw)
    }
}

/// Returns the `page`-th slice of `items` at [`QUESTIONS_PER_PAGE`] per page.
///
/// Out-of-range pages yield an empty slice.
#[must_use]
pub fn paginate<T>(items: &[T], page: PageNumber) -> &[T] {
    paginate_with(items, page, QUESTIONS_PER_PAGE)
}

/// Same as [`paginate`] with an explicit page size.
#[must_use]
pub fn paginate_with<T>(items: &[T], page: PageNumber, page_size: usize) -> &[T] {
    let index = usize::try_from(page.get() - 1).unwrap_or(usize::MAX);
    let start = index.saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
