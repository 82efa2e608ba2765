//! Blocking HTTP implementation of the transport.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};

use super::{ListQuery, NoteTransport, TransportError, TransportResult};
use crate::domain::{Note, NoteId, NotesPage, ValidDraft};

/// Base URL of the public notehub API.
pub const DEFAULT_BASE_URL: &str = "https://notehub-public.goit.study/api";

/// Client for the remote notes API.
///
/// Every request carries `Authorization: Bearer <token>` when a token is
/// configured. Without one, requests go out unauthenticated and the server's
/// 401 comes back as [`TransportError::Unauthorized`].
pub struct HttpTransport {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with the given request timeout.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> TransportResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransportError::InvalidBaseUrl(base_url));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            client,
        })
    }

    /// Returns the base URL requests are built from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and turns non-2xx statuses into errors.
    fn execute(&self, method: &str, url: &str, request: RequestBuilder) -> TransportResult<Response> {
        let response = self.authorize(request).send()?;
        let status = response.status();
        debug!("{} {} -> {}", method, url, status.as_u16());

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(TransportError::from_status(status.as_u16(), &body))
        }
    }
}

impl NoteTransport for HttpTransport {
    fn list_notes(&self, query: &ListQuery) -> TransportResult<NotesPage> {
        let url = self.notes_url();
        let page = query.page.to_string();
        let per_page = query.per_page.to_string();
        let request = self.client.get(&url).query(&[
            ("page", page.as_str()),
            ("search", query.search.as_str()),
            ("perPage", per_page.as_str()),
        ]);

        let body = self.execute("GET", &url, request)?.text()?;
        let page: NotesPage = serde_json::from_str(&body)?;
        Ok(page.with_requested_page(query.page))
    }

    fn create_note(&self, draft: &ValidDraft) -> TransportResult<Note> {
        let url = self.notes_url();
        let request = self.client.post(&url).json(draft);

        let body = self.execute("POST", &url, request)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn delete_note(&self, id: &NoteId) -> TransportResult<Option<Note>> {
        let url = format!("{}/{}", self.notes_url(), id);
        let request = self.client.delete(&url);

        let body = self.execute("DELETE", &url, request)?.text()?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }
}
