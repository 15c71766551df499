//! Temperature conversion program.

use webserv_cgi::cgi::read_body;
use webserv_cgi::scripts::temperature;
use webserv_cgi::{app, CgiError, CgiRequest};

fn main() {
    app::init();
    let request = CgiRequest::from_env();

    let result = if request.is_post() {
        read_body(std::io::stdin().lock(), request.content_length)
            .map_err(CgiError::from)
            .and_then(|body| temperature::respond(&request, &body))
    } else {
        temperature::respond(&request, &[])
    };

    app::emit_result(result);
}
