//! Pagination controller.

use thiserror::Error;

/// A page request outside the known bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page {requested} is out of range{}", bounds(.total_pages))]
pub struct PageOutOfRange {
    pub requested: u32,
    pub total_pages: Option<u32>,
}

fn bounds(total_pages: &Option<u32>) -> String {
    match total_pages {
        Some(total) => format!(" (1..={})", (*total).max(1)),
        None => " (pages start at 1)".to_string(),
    }
}

/// Tracks the current page of a listing.
///
/// The page is never clamped on request; an out-of-range request is handed
/// back to the caller. The only automatic moves are [`Pagination::reset`] on
/// search settlement and [`Pagination::on_fetched`] when the server reports
/// fewer pages than the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    total_pages: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: None,
        }
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current 1-based page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page count last reported by the server for this search.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Moves to `page`.
    ///
    /// # Errors
    ///
    /// Returns `PageOutOfRange` for page 0, or for a page past
    /// `max(1, total_pages)` once totals are known. The current page is left
    /// unchanged.
    pub fn set_page(&mut self, page: u32) -> Result<(), PageOutOfRange> {
        let upper = self.total_pages.map(|t| t.max(1)).unwrap_or(u32::MAX);
        if page == 0 || page > upper {
            return Err(PageOutOfRange {
                requested: page,
                total_pages: self.total_pages,
            });
        }
        self.page = page;
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), PageOutOfRange> {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn prev(&mut self) -> Result<(), PageOutOfRange> {
        self.set_page(self.page - 1)
    }

    /// Returns to page 1 and forgets the totals of the previous search.
    ///
    /// Unconditional: runs on every search settlement, even when the settled
    /// term did not change.
    pub fn reset(&mut self) {
        self.page = 1;
        self.total_pages = None;
    }

    /// Records the totals of a successful fetch for the current page.
    ///
    /// Returns true if the current page was past the last page and had to be
    /// moved, in which case the caller must fetch again.
    pub fn on_fetched(&mut self, total_pages: u32) -> bool {
        self.total_pages = Some(total_pages);
        let last = total_pages.max(1);
        if self.page > last {
            self.page = last;
            true
        } else {
            false
        }
    }

    /// Returns true if a pagination widget should be shown.
    ///
    /// A single page (or no result at all) has nothing to navigate.
    pub fn controls_visible(&self) -> bool {
        self.total_pages.is_some_and(|t| t > 1)
    }
}
