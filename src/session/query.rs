//! Cache identity of a list read.

use std::fmt;

/// The identity under which a list page is cached: `(term, page, per_page)`.
///
/// Two fetches with equal keys are the same logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    term: String,
    page: u32,
    per_page: u32,
}

impl QueryKey {
    pub fn new(term: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            term: term.into(),
            page,
            per_page,
        }
    }

    /// Returns the settled search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "notes[search={:?}, page={}, per_page={}]",
            self.term, self.page, self.per_page
        )
    }
}
