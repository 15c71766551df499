//! Arithmetic calculator program.

use std::time::Instant;

use webserv_cgi::cgi::read_body;
use webserv_cgi::scripts::calculator;
use webserv_cgi::{app, CgiError, CgiRequest};

fn main() {
    let started = Instant::now();
    app::init();
    let request = CgiRequest::from_env();

    let result = if request.is_post() {
        read_body(std::io::stdin().lock(), request.content_length)
            .map_err(CgiError::from)
            .and_then(|body| calculator::respond(&request, &body, started))
    } else {
        calculator::respond(&request, &[], started)
    };

    app::emit_result(result);
}
