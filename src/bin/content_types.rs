//! Content-type negotiation program.

use webserv_cgi::cgi::read_body;
use webserv_cgi::scripts::content_types;
use webserv_cgi::{app, CgiRequest};

fn main() {
    app::init();
    let request = CgiRequest::from_env();

    let body = if request.is_post() {
        read_body(std::io::stdin().lock(), request.content_length).unwrap_or_else(|e| {
            tracing::warn!("Failed to read request body: {}", e);
            Vec::new()
        })
    } else {
        Vec::new()
    };

    app::emit(&content_types::respond(&request, &body));
}
