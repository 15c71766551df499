//! Content-type negotiation driven by the `type` form field.

use serde_json::json;

use crate::cgi::{CgiRequest, CgiResponse};

/// Requested representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Html,
    Json,
}

impl ContentKind {
    /// `html` and `json` select those kinds; anything else is plain text.
    pub fn from_param(value: &str) -> Self {
        match value {
            "html" => ContentKind::Html,
            "json" => ContentKind::Json,
            _ => ContentKind::Text,
        }
    }
}

/// Build the response for the requested kind.
pub fn respond(request: &CgiRequest, body: &[u8]) -> CgiResponse {
    let form = request.form(body);
    let kind = ContentKind::from_param(form.get_or("type", "text"));
    tracing::debug!("Serving {:?} content", kind);

    match kind {
        ContentKind::Text => CgiResponse::text("This is plain text content\n"),
        ContentKind::Html => CgiResponse::new(
            "text/html",
            "<html><body><h1>HTML Content</h1><p>This is HTML formatted text</p></body></html>\n",
        ),
        ContentKind::Json => {
            let value = json!({"message": "This is JSON data", "status": "success"});
            CgiResponse::json(format!("{value}\n"))
        }
    }
}
