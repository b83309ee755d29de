use crate::types::ChatRequest;
use crate::util::parse_bool_flag;
use anyhow::{Context, Result};
use env_logger::{Env, Target};
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

const DEFAULT_LOG_PATH: &str = "/tmp/codelens.log";
const LOG_FILTER_ENV: &str = "CODELENS_LOG";
const LOG_PATH_ENV: &str = "CODELENS_LOG_PATH";
const DEBUG_PAYLOAD_ENV: &str = "CODELENS_DEBUG_PAYLOAD";

/// Installs the global logger. Returns the file it writes to, or `None` when
/// logging goes to stderr.
///
/// While the TUI owns the terminal, log lines must not reach the screen, so a
/// terminal stderr is swapped for a file unless `CODELENS_LOG_PATH` says otherwise.
pub fn init_logging() -> Result<Option<PathBuf>> {
    let mut builder = env_logger::Builder::from_env(Env::default().filter_or(LOG_FILTER_ENV, "info"));

    let path = resolve_log_path();
    if let Some(path) = &path {
        let file = open_log_file(path)
            .with_context(|| format!("cannot open log file '{}'", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("logger already initialized")?;
    Ok(path)
}

pub fn debug_payload_enabled() -> bool {
    std::env::var(DEBUG_PAYLOAD_ENV)
        .ok()
        .and_then(parse_bool_flag)
        .unwrap_or(false)
}

pub fn emit_debug_payload(request: &ChatRequest) {
    let formatted_payload = serde_json::to_string_pretty(request)
        .unwrap_or_else(|_| "<payload serialization error>".to_string());
    log::debug!(
        target: "codelens::api",
        "payload_request model={}\npayload:\n{formatted_payload}",
        request.model
    );
}

fn resolve_log_path() -> Option<PathBuf> {
    std::env::var(LOG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                Some(PathBuf::from(DEFAULT_LOG_PATH))
            } else {
                None
            }
        })
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
