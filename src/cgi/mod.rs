//! CGI request/response plumbing.
//!
//! The host server runs one process per request: metadata arrives in
//! environment variables, the body on standard input, and the program answers
//! with a header block and body on standard output.

mod form;
mod response;

pub use form::FormData;
pub use response::CgiResponse;

use std::collections::BTreeMap;
use std::io::Read;

/// Content type of URL-encoded HTML forms.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Request metadata taken from the CGI environment.
#[derive(Debug, Clone, Default)]
pub struct CgiRequest {
    /// `REQUEST_METHOD`, as sent by the host (case preserved).
    pub method: String,
    /// `CONTENT_TYPE`, if set.
    pub content_type: Option<String>,
    /// `CONTENT_LENGTH`, if set and numeric.
    pub content_length: Option<usize>,
    /// `QUERY_STRING`, empty if unset.
    pub query_string: String,
    /// Every environment variable, sorted by name.
    pub vars: BTreeMap<String, String>,
}

impl CgiRequest {
    /// Capture the request from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a request from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let get = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            method: get("REQUEST_METHOD").unwrap_or_default(),
            content_type: get("CONTENT_TYPE"),
            content_length: get("CONTENT_LENGTH").and_then(|v| v.trim().parse().ok()),
            query_string: get("QUERY_STRING").unwrap_or_default(),
            vars,
        }
    }

    /// Whether the request method is POST (case-insensitive).
    pub fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }

    /// Whether the body is URL-encoded form data.
    pub fn is_form_urlencoded(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
    }

    /// Collect form fields: query string pairs, then body pairs for a
    /// URL-encoded POST.
    pub fn form(&self, body: &[u8]) -> FormData {
        let mut form = FormData::parse(self.query_string.as_bytes());
        if self.is_post() && self.is_form_urlencoded() {
            form.extend(FormData::parse(body));
        }
        form
    }
}

/// Read the request body.
///
/// # Arguments
///
/// * `reader` - Usually standard input
/// * `content_length` - Parsed `CONTENT_LENGTH`, if the server sent one
///
/// # Returns
///
/// At most `content_length` bytes when it is known (fewer if the reader
/// ends early); otherwise everything up to EOF.
pub fn read_body<R: Read>(mut reader: R, content_length: Option<usize>) -> std::io::Result<Vec<u8>> {
    let mut body = Vec::new();
    match content_length {
        Some(len) => reader.by_ref().take(len as u64).read_to_end(&mut body)?,
        None => reader.read_to_end(&mut body)?,
    };
    Ok(body)
}
