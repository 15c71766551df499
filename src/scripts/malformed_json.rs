//! Deliberately invalid JSON, used to exercise the server's 400 handling.

use crate::cgi::CgiResponse;

/// The string value is never closed.
pub const MALFORMED_BODY: &str = "{\n  \"title\": \"Test d'erreur 400\",\n  \"message\": \"Ce JSON est délibérément malformé\n}\n";

pub fn respond() -> CgiResponse {
    CgiResponse::json(MALFORMED_BODY)
}
