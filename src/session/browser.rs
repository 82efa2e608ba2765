//! The notes list session: search box, pagination, cache and creation form
//! wired together behind one view.

use std::time::{Duration, Instant};

use log::{debug, warn};

use super::{
    Completion, CreationWorkflow, FetchTicket, Lookup, PageOutOfRange, Pagination, QueryCache,
    QueryKey, SearchDebouncer, SubmitError,
};
use crate::domain::{Note, NoteId, NotesPage};
use crate::session::debounce::DEFAULT_DEBOUNCE;
use crate::transport::{NoteTransport, TransportResult};

/// Default number of notes per page.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Tuning knobs of a browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserOptions {
    pub per_page: u32,
    pub debounce: Duration,
    pub stale_after: Option<Duration>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            debounce: DEFAULT_DEBOUNCE,
            stale_after: None,
        }
    }
}

/// Pagination widget state, present only when there is more than one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub page: u32,
    pub total_pages: u32,
}

/// What the list area should show for the current query.
#[derive(Debug, PartialEq)]
pub enum ListView<'a> {
    /// Nothing cached yet and a fetch is pending or in flight.
    Loading,
    /// The query matched no notes ("No notes found"). Not an error.
    Empty,
    /// A page of notes, with controls when there is more than one page.
    Notes {
        page: &'a NotesPage,
        controls: Option<PageControls>,
    },
    /// The last fetch failed; `previous` is the older data still cached.
    Failed {
        message: &'a str,
        previous: Option<&'a NotesPage>,
    },
}

/// One list session.
pub struct NotesBrowser {
    search: SearchDebouncer,
    pagination: Pagination,
    cache: QueryCache,
    creation: CreationWorkflow,
    per_page: u32,
}

impl Default for NotesBrowser {
    fn default() -> Self {
        Self::new(BrowserOptions::default())
    }
}

impl NotesBrowser {
    pub fn new(options: BrowserOptions) -> Self {
        Self {
            search: SearchDebouncer::new(options.debounce),
            pagination: Pagination::new(),
            cache: QueryCache::with_stale_after(options.stale_after),
            creation: CreationWorkflow::new(),
            per_page: options.per_page.max(1),
        }
    }

    // ===========================================
    // Search & pagination
    // ===========================================

    /// Replaces the search box text.
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search.input(text, now);
    }

    /// Settles the search if its window passed. Returns true on settlement,
    /// after which the page is 1 again.
    pub fn poll(&mut self, now: Instant) -> bool {
        let settled = self.search.poll(now).map(str::to_string);
        self.on_settled(settled)
    }

    /// Settles pending search input immediately.
    pub fn flush_search(&mut self) -> bool {
        let settled = self.search.flush().map(str::to_string);
        self.on_settled(settled)
    }

    fn on_settled(&mut self, settled: Option<String>) -> bool {
        match settled {
            Some(term) => {
                debug!("search settled on {:?}", term);
                self.pagination.reset();
                true
            }
            None => false,
        }
    }

    /// Returns when pending search input will settle.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn search(&self) -> &SearchDebouncer {
        &self.search
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Moves to `page`.
    ///
    /// # Errors
    ///
    /// Returns `PageOutOfRange` if `page` is outside the known bounds.
    pub fn set_page(&mut self, page: u32) -> Result<(), PageOutOfRange> {
        self.pagination.set_page(page)
    }

    pub fn next_page(&mut self) -> Result<(), PageOutOfRange> {
        self.pagination.next()
    }

    pub fn prev_page(&mut self) -> Result<(), PageOutOfRange> {
        self.pagination.prev()
    }

    /// Returns the key the list is currently showing.
    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(self.search.settled(), self.pagination.page(), self.per_page)
    }

    // ===========================================
    // Fetching
    // ===========================================

    /// Issues a fetch for the current key if it needs one.
    ///
    /// Returns `None` when the key is fresh, when its last fetch failed (see
    /// [`NotesBrowser::retry`]), or when a fetch for it is already in flight.
    ///
    /// A cache hit still updates the page bounds from the cached page, since
    /// a settled search forgets the previous ones.
    pub fn next_fetch(&mut self) -> Option<FetchTicket> {
        loop {
            let key = self.query_key();
            if self.cache.needs_fetch(&key) {
                return self.cache.begin_fetch(key);
            }
            debug!("cache hit for {}", key);
            let Some(total_pages) = self.cache.lookup(&key).page().map(NotesPage::total_pages) else {
                return None;
            };
            // The page only ever moves down, so this ends.
            if !self.pagination.on_fetched(total_pages) {
                return None;
            }
        }
    }

    /// Applies a fetch result.
    ///
    /// Results for a key other than the current one are still cached under
    /// their own key, but never touch pagination.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: TransportResult<NotesPage>) -> Completion {
        let is_current = ticket.key() == &self.query_key();
        let key = ticket.key().clone();
        let completion = self.cache.complete(ticket, result);

        match &completion {
            Completion::Stored if is_current => {
                let total_pages = self
                    .cache
                    .lookup(&key)
                    .page()
                    .map(NotesPage::total_pages)
                    .unwrap_or(0);
                if self.pagination.on_fetched(total_pages) {
                    debug!(
                        "page {} past last page {}, moved to {}",
                        key.page(),
                        total_pages,
                        self.pagination.page()
                    );
                }
            }
            Completion::Failed(err) if is_current => {
                warn!("failed to load notes for {}: {}", key, err);
            }
            _ => {}
        }
        completion
    }

    /// Runs fetches through `transport` until the current key needs none.
    ///
    /// Fetches again only when a result moved the page; a key is fetched at
    /// most once per call even if its entry expires immediately.
    pub fn refresh(&mut self, transport: &dyn NoteTransport) {
        let mut last: Option<QueryKey> = None;
        loop {
            let key = self.query_key();
            if last.as_ref() == Some(&key) {
                break;
            }
            let Some(ticket) = self.next_fetch() else {
                break;
            };
            let result = transport.list_notes(&ticket.query());
            self.complete_fetch(ticket, result);
            last = Some(key);
        }
    }

    /// Allows the current key to be fetched again after a failure.
    pub fn retry(&mut self) {
        let key = self.query_key();
        self.cache.clear_error(&key);
    }

    /// Returns what the list area should show.
    pub fn view(&self) -> ListView<'_> {
        let key = self.query_key();
        let lookup = self.cache.lookup(&key);

        if let Some(message) = self.cache.last_error(&key) {
            return ListView::Failed {
                message,
                previous: lookup.page(),
            };
        }

        match lookup {
            Lookup::Missing => ListView::Loading,
            Lookup::Fresh(page) | Lookup::Stale(page) if page.is_empty() => ListView::Empty,
            Lookup::Fresh(page) | Lookup::Stale(page) => {
                let controls = (page.total_pages() > 1).then(|| PageControls {
                    page: self.pagination.page(),
                    total_pages: page.total_pages(),
                });
                ListView::Notes { page, controls }
            }
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Clears the cache and returns to the first page of the current search.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.pagination.reset();
    }

    // ===========================================
    // Mutations
    // ===========================================

    /// Opens the creation form.
    pub fn open_create(&mut self) {
        self.creation.open();
    }

    pub fn creation(&self) -> &CreationWorkflow {
        &self.creation
    }

    pub fn creation_mut(&mut self) -> &mut CreationWorkflow {
        &mut self.creation
    }

    /// Closes the creation form, discarding its draft.
    pub fn cancel_create(&mut self) {
        self.creation.cancel();
    }

    /// Submits the creation form.
    ///
    /// # Errors
    ///
    /// See [`CreationWorkflow::submit`].
    pub fn submit_create(&mut self, transport: &dyn NoteTransport) -> Result<Note, SubmitError> {
        self.creation.submit(transport, &mut self.cache)
    }

    /// Deletes a note and invalidates every cached list on success.
    ///
    /// # Errors
    ///
    /// Returns the transport error; the cache is left untouched.
    pub fn delete(&mut self, transport: &dyn NoteTransport, id: &NoteId) -> TransportResult<Option<Note>> {
        match transport.delete_note(id) {
            Ok(deleted) => {
                self.cache.invalidate_all();
                Ok(deleted)
            }
            Err(err) => {
                warn!("failed to delete note {}: {}", id, err);
                Err(err)
            }
        }
    }
}
