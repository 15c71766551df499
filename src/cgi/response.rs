//! CGI response: header block plus body.

use std::io::Write;

/// One CGI response.
///
/// `Content-Type` is always written first, followed by any extra headers.
/// The host server supplies the status line (200 unless it decides
/// otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgiResponse {
    content_type: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CgiResponse {
    /// Create a response with an arbitrary content type.
    pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header after `Content-Type`. Repeated names are all written.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Response headers that disable caching by the client and proxies.
    pub fn no_cache(self) -> Self {
        self.with_header("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0")
            .with_header("Pragma", "no-cache")
    }

    /// `text/html; charset=utf-8` response.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self::new("text/html; charset=utf-8", body)
    }

    /// `text/plain` response.
    pub fn text(body: impl Into<Vec<u8>>) -> Self {
        Self::new("text/plain", body)
    }

    /// `application/json` response.
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self::new("application/json", body)
    }

    /// Value of the `Content-Type` header.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Extra headers, in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Write the header block, a blank line, and the body.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "Content-Type: {}", self.content_type)?;
        for (name, value) in &self.headers {
            writeln!(out, "{name}: {value}")?;
        }
        writeln!(out)?;
        out.write_all(&self.body)?;
        out.flush()
    }
}
