//! Notes and list pages as returned by the notes API.

use crate::domain::{NoteId, NoteTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as stored by the server.
///
/// Notes are created by the server in response to a creation request and are
/// never mutated client-side; the struct therefore exposes accessors only.
///
/// # Fields
/// - `id`: opaque server-assigned identifier
/// - `title`: 3 to 50 characters
/// - `content`: up to 500 characters, possibly empty
/// - `tag`: one of the fixed [`NoteTag`] values
/// - `createdAt` / `updatedAt`: optional server timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    title: String,
    #[serde(default)]
    content: String,
    tag: NoteTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Creates a note without timestamps.
    pub fn new(id: NoteId, title: impl Into<String>, content: impl Into<String>, tag: NoteTag) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            tag,
            created_at: None,
            updated_at: None,
        }
    }

    /// Attaches server timestamps.
    pub fn with_timestamps(mut self, created: DateTime<Utc>, updated: DateTime<Utc>) -> Self {
        self.created_at = Some(created);
        self.updated_at = Some(updated);
        self
    }

    /// Returns the note's identifier.
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note's body text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the note's tag.
    pub fn tag(&self) -> NoteTag {
        self.tag
    }

    /// Returns when the server created the note, if reported.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns when the server last updated the note, if reported.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// One page of a filtered note listing.
///
/// A server-computed, read-only snapshot. It is replaced whole on every
/// successful fetch. `total_pages` is 0 when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

impl NotesPage {
    /// Creates a page snapshot.
    pub fn new(notes: Vec<Note>, page: u32, total_pages: u32, total_results: u32) -> Self {
        Self {
            notes,
            page,
            total_pages,
            total_results,
        }
    }

    /// An empty result set for `page`.
    pub fn empty(page: u32) -> Self {
        Self::new(Vec::new(), page, 0, 0)
    }

    /// Fills in the page number when the server omitted it.
    pub(crate) fn with_requested_page(mut self, requested: u32) -> Self {
        if self.page == 0 {
            self.page = requested;
        }
        self
    }

    /// Returns the notes on this page, in server order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the number of pages the server reports for the query.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns the number of matching notes across all pages.
    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Returns true if this page holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
