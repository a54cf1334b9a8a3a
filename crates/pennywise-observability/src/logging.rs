use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_DIR: &str = "storage/logs";

/// Flush guards for the file writers. Dropping them flushes pending lines.
#[must_use = "dropping the guards stops file logging"]
#[derive(Debug)]
pub struct LoggingGuards {
    _error_file: WorkerGuard,
    _json_file: WorkerGuard,
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(format!(
            "pennywise={level},pennywise_db={level},pennywise_auth={level},tower_http=warn,hyper=warn,sqlx=warn"
        ))
    })
}

/// Initializes logging under `LOG_DIR` (default `storage/logs`).
pub fn init_logging() -> io::Result<LoggingGuards> {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    init_logging_in(log_dir)
}

/// Initializes the global subscriber writing files into `log_dir`.
///
/// A subscriber that is already installed is left in place.
pub fn init_logging_in(log_dir: impl AsRef<Path>) -> io::Result<LoggingGuards> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir)?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter());

    let (error_writer, error_guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        log_dir,
        "pennywise.log",
    ));
    let file_layer = fmt::layer()
        .with_writer(error_writer)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let (json_writer, json_guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        log_dir,
        "pennywise.json",
    ));
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()
        .is_err()
    {
        eprintln!("tracing subscriber already set, keeping the existing one");
    }

    Ok(LoggingGuards {
        _error_file: error_guard,
        _json_file: json_guard,
    })
}
