//! Test helpers for upload and CGI program tests.
//!
//! Provides a multipart body builder and a runner that executes a program
//! binary under the CGI contract.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Boundary used by [`MultipartBuilder`].
pub const BOUNDARY: &str = "----webservTestBoundary7MA4YWxkTrZu0gW";

/// Builder for multipart/form-data request bodies.
#[derive(Default)]
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content-Type header value matching the body.
    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    /// Add a file part under the given field name.
    pub fn file(mut self, field: &str, filename: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Add an `uploaded_file` part.
    pub fn upload(self, filename: &str, content: &[u8]) -> Self {
        self.file("uploaded_file", filename, content)
    }

    /// Add a plain text field.
    pub fn text(mut self, field: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"\r\n\r\n\
                 {value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Finish the body with the closing boundary.
    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// Output of one program run, split at the header/body separator.
pub struct CgiOutput {
    pub headers: String,
    pub body: String,
}

impl CgiOutput {
    fn parse(raw: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(raw).into_owned();
        match raw.split_once("\n\n") {
            Some((headers, body)) => Self {
                headers: headers.to_string(),
                body: body.to_string(),
            },
            None => Self {
                headers: raw,
                body: String::new(),
            },
        }
    }

    /// Value of the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Value of the first header called `wanted` (case-insensitive).
    pub fn header(&self, wanted: &str) -> Option<&str> {
        self.headers.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case(wanted).then(|| value.trim())
        })
    }
}

/// Run a program binary with a clean environment plus `vars`, feeding
/// `stdin` to it.
///
/// The configuration file is pointed at a path that does not exist so
/// only defaults and the given variables apply.
pub fn run_cgi(program: &str, vars: &[(&str, &str)], stdin: &[u8], work_dir: &Path) -> CgiOutput {
    let mut child = Command::new(program)
        .env_clear()
        .env("WEBSERV_CGI_CONFIG", work_dir.join("no-such-config.toml"))
        .envs(vars.iter().copied())
        .current_dir(work_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CGI program");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin)
        .expect("Failed to write request body");

    let output = child.wait_with_output().expect("Failed to wait for program");
    assert!(
        output.status.success(),
        "program exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    CgiOutput::parse(&output.stdout)
}

/// Sorted file names in a directory (empty if it does not exist).
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Whether `name` looks like `YYYYMMDD_HHMMSS_<original>`.
pub fn is_timestamped(name: &str, original: &str) -> bool {
    let Some(prefix) = name.strip_suffix(original) else {
        return false;
    };
    let bytes = prefix.as_bytes();
    bytes.len() == 16
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'_'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
        && bytes[15] == b'_'
}
