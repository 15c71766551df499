//! webserv-cgi - demonstration CGI programs.
//!
//! A file-upload handler plus small programs showing content-type
//! negotiation, environment introspection, POST echo, JSON unit and
//! arithmetic calculators, and a deliberately malformed JSON responder.

pub mod app;
pub mod cgi;
pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod scripts;
pub mod upload;

pub use cgi::{CgiRequest, CgiResponse, FormData};
pub use config::Config;
pub use error::{CgiError, Result};
pub use upload::{
    format_size, StoredFile, UploadError, UploadHandler, UploadOutcome, UploadReport,
    UploadRequest, UploadStorage,
};
