//! File upload program.

use tokio::io::AsyncReadExt;
use tracing::info;

use webserv_cgi::{app, CgiRequest, UploadHandler, UploadRequest};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = app::init();
    let request = CgiRequest::from_env();
    let handler = UploadHandler::from_config(&config.upload);

    info!(
        "Upload request: method={} dir={}",
        request.method,
        handler.upload_dir().display()
    );

    let limit = request.content_length.map_or(u64::MAX, |len| len as u64);
    let body = tokio::io::stdin().take(limit);
    let response = handler
        .respond(UploadRequest::from_cgi(&request, body))
        .await;

    app::emit(&response);
}
