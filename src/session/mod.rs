//! Client-side coordination of search, pagination, caching and mutations.
//!
//! Everything here is a single-threaded state machine. The only suspension
//! points are transport calls, which are split into an issue half
//! ([`QueryCache::begin_fetch`], [`CreationWorkflow::begin_submit`]) and a
//! completion half, so a front end can run them however it likes.

mod browser;
mod cache;
mod create;
mod debounce;
mod pagination;
mod query;

pub use browser::{BrowserOptions, DEFAULT_PER_PAGE, ListView, NotesBrowser, PageControls};
pub use cache::{Completion, FetchTicket, Lookup, QueryCache};
pub use create::{CreationWorkflow, SubmitError, WorkflowState};
pub use debounce::{DEFAULT_DEBOUNCE, DebounceState, SearchDebouncer};
pub use pagination::{PageOutOfRange, Pagination};
pub use query::QueryKey;
