//! List command handler.

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};

use super::write_view;
use crate::cli::ListArgs;
use crate::session::{BrowserOptions, NotesBrowser};
use crate::transport::NoteTransport;

/// Handle the `ls` command: fetch one page and print it.
///
/// A page past the last one is moved back to the last page the server
/// reports, the same way the interactive list does.
pub fn handle_list(
    args: &ListArgs,
    transport: &dyn NoteTransport,
    options: BrowserOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let mut browser = NotesBrowser::new(options);

    if let Some(term) = &args.search {
        browser.type_search(term.as_str(), Instant::now());
        browser.flush_search();
    }
    browser
        .set_page(args.page)
        .context("invalid --page")?;

    browser.refresh(transport);

    let search = browser.search().settled().to_string();
    write_view(out, &browser.view(), &search, args.format)
}
