//! In-memory transport that records every call, for unit tests.

use std::cell::{Cell, RefCell};

use super::{ListQuery, NoteTransport, TransportError, TransportResult};
use crate::domain::{Note, NoteId, NoteTag, NotesPage, ValidDraft};

/// A fake notes server.
///
/// Search is a case-insensitive substring match on title and content.
/// Failures can be queued with [`RecordingTransport::fail_next`].
#[derive(Default)]
pub(crate) struct RecordingTransport {
    notes: RefCell<Vec<Note>>,
    next_id: Cell<u32>,
    list_calls: RefCell<Vec<ListQuery>>,
    create_calls: RefCell<Vec<ValidDraft>>,
    delete_calls: RefCell<Vec<NoteId>>,
    failures: RefCell<Vec<TransportError>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `count` notes titled "Note 1".."Note N".
    pub(crate) fn with_notes(count: u32) -> Self {
        let transport = Self::new();
        for i in 1..=count {
            transport.insert(&format!("Note {}", i), "", NoteTag::Todo);
        }
        transport
    }

    pub(crate) fn insert(&self, title: &str, content: &str, tag: NoteTag) -> Note {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let note = Note::new(id.to_string().parse().unwrap(), title, content, tag);
        self.notes.borrow_mut().push(note.clone());
        note
    }

    /// Makes the next call of any kind fail with `error`.
    pub(crate) fn fail_next(&self, error: TransportError) {
        self.failures.borrow_mut().push(error);
    }

    pub(crate) fn list_calls(&self) -> Vec<ListQuery> {
        self.list_calls.borrow().clone()
    }

    pub(crate) fn create_calls(&self) -> Vec<ValidDraft> {
        self.create_calls.borrow().clone()
    }

    pub(crate) fn delete_calls(&self) -> Vec<NoteId> {
        self.delete_calls.borrow().clone()
    }

    fn take_failure(&self) -> TransportResult<()> {
        match self.failures.borrow_mut().pop() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl NoteTransport for RecordingTransport {
    fn list_notes(&self, query: &ListQuery) -> TransportResult<NotesPage> {
        self.list_calls.borrow_mut().push(query.clone());
        self.take_failure()?;

        let needle = query.search.to_lowercase();
        let matching: Vec<Note> = self
            .notes
            .borrow()
            .iter()
            .filter(|n| {
                needle.is_empty()
                    || n.title().to_lowercase().contains(&needle)
                    || n.content().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        let per_page = query.per_page.max(1) as usize;
        let total_results = matching.len() as u32;
        let total_pages = matching.len().div_ceil(per_page) as u32;
        let start = (query.page.saturating_sub(1) as usize) * per_page;
        let notes = matching.into_iter().skip(start).take(per_page).collect();

        Ok(NotesPage::new(notes, query.page, total_pages, total_results))
    }

    fn create_note(&self, draft: &ValidDraft) -> TransportResult<Note> {
        self.create_calls.borrow_mut().push(draft.clone());
        self.take_failure()?;
        Ok(self.insert(draft.title(), draft.content(), draft.tag()))
    }

    fn delete_note(&self, id: &NoteId) -> TransportResult<Option<Note>> {
        self.delete_calls.borrow_mut().push(id.clone());
        self.take_failure()?;

        let mut notes = self.notes.borrow_mut();
        match notes.iter().position(|n| n.id() == id) {
            Some(idx) => Ok(Some(notes.remove(idx))),
            None => Err(TransportError::NotFound {
                message: format!("note {} not found", id),
            }),
        }
    }
}
