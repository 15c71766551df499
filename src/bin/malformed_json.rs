//! Malformed JSON program.

use webserv_cgi::app;
use webserv_cgi::scripts::malformed_json;

fn main() {
    app::init();
    app::emit(&malformed_json::respond());
}
