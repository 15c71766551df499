//! Start-up and output helpers shared by the program binaries.

use std::io::Write;

use crate::cgi::CgiResponse;
use crate::Config;

/// Load configuration and initialize logging.
///
/// Never fails: a broken configuration falls back to defaults so the program
/// can still answer the request.
pub fn init() -> Config {
    let (config, load_error) = match Config::from_env() {
        Ok(config) => (config, None),
        Err(e) => {
            let mut config = Config::default();
            config.apply_env_overrides();
            (config, Some(e))
        }
    };

    if let Err(e) = crate::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        crate::logging::init_stderr_only(&config.logging.level);
    }

    if let Some(e) = load_error {
        tracing::warn!("Failed to load configuration, using defaults: {}", e);
    }

    config
}

/// Write `response` to standard output.
pub fn emit(response: &CgiResponse) {
    emit_to(response, std::io::stdout().lock());
}

/// Write `response` to `out`, logging write failures.
pub fn emit_to<W: Write>(response: &CgiResponse, out: W) {
    if let Err(e) = response.write_to(out) {
        tracing::error!("Failed to write response: {}", e);
    }
}

/// Emit the result of a program, or a plain-text error page.
pub fn emit_result(result: crate::Result<CgiResponse>) {
    match result {
        Ok(response) => emit(&response),
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            emit(&CgiResponse::text(format!("Internal error: {e}\n")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_to() {
        let mut out = Vec::new();
        emit_to(&CgiResponse::json("{}"), &mut out);
        assert_eq!(out, b"Content-Type: application/json\n\n{}");
    }
}
