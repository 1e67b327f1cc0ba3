//! Optional file logging of outbound API traffic.
//!
//! Raw mode owns the terminal, so diagnostics cannot just go to stderr
//! while the app runs. When `PARLEY_DEBUG_PAYLOAD` is set, request payloads
//! and failures are appended to a log file instead: `PARLEY_API_LOG_PATH`
//! if given, otherwise a fixed path under /tmp when stderr is a terminal.

use serde_json::Value;
use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};

const DEFAULT_API_LOG_PATH: &str = "/tmp/parley-debug-payload.log";
const DEBUG_PAYLOAD_ENV: &str = "PARLEY_DEBUG_PAYLOAD";
const API_LOG_PATH_ENV: &str = "PARLEY_API_LOG_PATH";

pub fn debug_payload_enabled() -> bool {
    std::env::var(DEBUG_PAYLOAD_ENV)
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

pub fn emit_debug_payload(request_url: &str, payload: &Value) {
    let formatted = serde_json::to_string_pretty(payload)
        .unwrap_or_else(|_| "<payload serialization error>".to_string());
    emit(&format!(
        "PARLEY_API DEBUG payload_request url={request_url}\npayload:\n{formatted}\n"
    ));
}

pub fn emit_request_failure(request_url: &str, detail: &str) {
    emit(&format!(
        "PARLEY_API ERROR request_failed url={request_url}\n{detail}\n"
    ));
}

fn emit(message: &str) {
    let written = resolve_log_path().is_some_and(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(message.as_bytes()))
            .is_ok()
    });
    if !written {
        eprintln!("{message}");
    }
}

fn resolve_log_path() -> Option<String> {
    if let Ok(path) = std::env::var(API_LOG_PATH_ENV) {
        let path = path.trim();
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    // The default path is only usable interactively; under a pipe, stderr
    // is the better sink.
    std::io::stderr()
        .is_terminal()
        .then(|| DEFAULT_API_LOG_PATH.to_string())
}
