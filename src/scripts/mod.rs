//! The small demonstration programs.
//!
//! Each one maps a [`CgiRequest`](crate::cgi::CgiRequest) (plus body, where
//! relevant) to a [`CgiResponse`](crate::cgi::CgiResponse) with no side
//! effects.

pub mod calculator;
pub mod content_types;
pub mod malformed_json;
pub mod temperature;
