//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{Note, NotesPage};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<&Note> for NoteListing {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            content: note.content().to_string(),
            tag: note.tag().to_string(),
            created_at: note.created_at().map(|t| t.to_rfc3339()),
            updated_at: note.updated_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageListing {
    pub search: String,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub notes: Vec<NoteListing>,
}

impl PageListing {
    pub fn new(search: &str, page: &NotesPage) -> Self {
        Self {
            search: search.to_string(),
            page: page.page(),
            total_pages: page.total_pages(),
            total_results: page.total_results(),
            notes: page.notes().iter().map(NoteListing::from).collect(),
        }
    }
}
