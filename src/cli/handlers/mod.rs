//! Command handlers for the CLI.
//!
//! Handlers take the transport as `&dyn NoteTransport` and write to a
//! caller-supplied sink so they can be driven by an in-memory fake in tests.

mod browse;
mod completions;
mod delete;
mod list;
mod new;


use std::io::Write;

use anyhow::Result;

use super::output::{NoteListing, Output, OutputFormat, PageListing};
use crate::domain::{NotesPage, ValidationErrors};
use crate::session::{ListView, PageControls};

// Re-export public items
pub use browse::{BrowseSession, Flow, handle_browse};
pub use completions::handle_completions;
pub use delete::handle_rm;
pub use list::handle_list;
pub use new::handle_new;

// ===========================================
// Shared Utilities
// ===========================================

const TITLE_WIDTH: usize = 50;

/// Writes the list area for `view`.
///
/// A failed fetch with no older data is returned as an error; with older data
/// the error is printed above the stale page.
pub(crate) fn write_view(
    out: &mut dyn Write,
    view: &ListView<'_>,
    search: &str,
    format: OutputFormat,
) -> Result<()> {
    match view {
        ListView::Loading => writeln!(out, "Loading...")?,
        ListView::Empty => write_page(out, &NotesPage::empty(1), None, search, format)?,
        ListView::Notes { page, controls } => write_page(out, page, *controls, search, format)?,
        ListView::Failed {
            message,
            previous: Some(page),
        } => {
            writeln!(out, "Error: {}", message)?;
            write_page(out, page, None, search, format)?;
        }
        ListView::Failed {
            message,
            previous: None,
        } => anyhow::bail!("failed to load notes: {}", message),
    }
    Ok(())
}

fn write_page(
    out: &mut dyn Write,
    page: &NotesPage,
    controls: Option<PageControls>,
    search: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if page.is_empty() {
                writeln!(out, "No notes found.")?;
                return Ok(());
            }

            writeln!(out, "{:<10}  {:<50}  {:<8}", "ID", "Title", "Tag")?;
            writeln!(
                out,
                "{:<10}  {:<50}  {:<8}",
                "----------",
                "--------------------------------------------------",
                "--------"
            )?;
            for note in page.notes() {
                let title = truncate_str(note.title(), TITLE_WIDTH);
                writeln!(out, "{:<10}  {:<50}  {:<8}", note.id().prefix(), title, note.tag())?;
            }

            writeln!(out)?;
            match controls {
                // The API does not always report a result count.
                Some(c) if page.total_results() > 0 => writeln!(
                    out,
                    "Page {} of {} ({} note(s))",
                    c.page,
                    c.total_pages,
                    page.total_results()
                )?,
                Some(c) => writeln!(out, "Page {} of {}", c.page, c.total_pages)?,
                None => writeln!(out, "{} note(s)", page.notes().len())?,
            }
        }
        OutputFormat::Json => {
            let output = Output::new(PageListing::new(search, page));
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }
    Ok(())
}

/// Writes one line per failing field, indented under the form.
pub(crate) fn write_field_errors(out: &mut dyn Write, errors: &ValidationErrors) -> Result<()> {
    for error in errors.iter() {
        writeln!(out, "  {}: {}", error.field, error.message)?;
    }
    Ok(())
}

pub(crate) fn note_json(note: &crate::domain::Note) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Output::new(NoteListing::from(note)))?)
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
