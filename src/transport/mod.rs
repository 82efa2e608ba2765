//! NoteTransport trait and error types.

mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::{DEFAULT_BASE_URL, HttpTransport};

use crate::domain::{Note, NoteId, NotesPage, ValidDraft};
use crate::session::QueryKey;
use thiserror::Error;

// ===========================================
// Errors
// ===========================================

/// Errors that can occur while talking to the notes API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server refused the credential (401/403). A missing or wrong token
    /// surfaces here.
    #[error("authentication failed ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The addressed note does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other non-2xx response, including server-side validation rejections.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl TransportError {
    /// Builds the error for a non-2xx status and its response body.
    ///
    /// Uses the JSON `message` field when the body has one, the raw body
    /// otherwise.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| body.trim().to_string());
        match status {
            401 | 403 => TransportError::Unauthorized { status, message },
            404 => TransportError::NotFound { message },
            _ => TransportError::Status { status, message },
        }
    }

    /// Returns true if the failure is an authentication problem.
    pub fn is_auth(&self) -> bool {
        matches!(self, TransportError::Unauthorized { .. })
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

// ===========================================
// Requests
// ===========================================

/// Parameters of a filtered, paginated list read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Search term; empty matches everything.
    pub search: String,
    /// Page size, at least 1.
    pub per_page: u32,
}

impl ListQuery {
    pub fn new(page: u32, search: impl Into<String>, per_page: u32) -> Self {
        Self {
            page,
            search: search.into(),
            per_page,
        }
    }
}

impl From<&QueryKey> for ListQuery {
    fn from(key: &QueryKey) -> Self {
        Self::new(key.page(), key.term(), key.per_page())
    }
}

// ===========================================
// Transport trait
// ===========================================

/// Access to the remote notes store.
///
/// Each call is one suspension point of the client; nothing else blocks.
/// Implementations do not retry.
pub trait NoteTransport {
    /// Reads one page of notes matching `query.search`.
    fn list_notes(&self, query: &ListQuery) -> TransportResult<NotesPage>;

    /// Persists a new note and returns the stored record.
    fn create_note(&self, draft: &ValidDraft) -> TransportResult<Note>;

    /// Removes a note. Returns the deleted record when the server echoes it.
    fn delete_note(&self, id: &NoteId) -> TransportResult<Option<Note>>;
}

impl<T: NoteTransport + ?Sized> NoteTransport for &T {
    fn list_notes(&self, query: &ListQuery) -> TransportResult<NotesPage> {
        (**self).list_notes(query)
    }

    fn create_note(&self, draft: &ValidDraft) -> TransportResult<Note> {
        (**self).create_note(draft)
    }

    fn delete_note(&self, id: &NoteId) -> TransportResult<Option<Note>> {
        (**self).delete_note(id)
    }
}
