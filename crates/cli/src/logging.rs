//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! One registry with two layers, installed once at startup and living until
//! the process exits:
//! - error records: ERROR events appended to the log file with a timestamp,
//! - console diagnostics on stderr.
//!
//! Console level priority:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `MAKESPAN_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `warn`

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Target of the failure records; kept off the console, which already shows
/// the full miette report.
const ERROR_TARGET: &str = "makespan::error_log";

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Installs the global subscriber. Call once.
pub fn init(log_file: &Path, cli_level: Option<LogLevel>) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot open log file {}", log_file.display()))?;

    let level = match cli_level {
        Some(lvl) => directive(lvl),
        None => std::env::var("MAKESPAN_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .map(directive)
            .unwrap_or("warn"),
    };

    let console_filter = EnvFilter::try_new(format!("{level},{ERROR_TARGET}=off"))
        .map_err(|e| miette!("Invalid log filter: {}", e))?;

    let error_log = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::ERROR);

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(error_log)
        .with(console)
        .try_init()
        .map_err(|e| miette!("Cannot install logger: {}", e))
}

/// Appends a failure to the error log.
pub fn record_failure(error: &miette::Report) {
    tracing::error!(target: ERROR_TARGET, "{}", error);
}

fn directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

fn parse_level_str(s: &str) -> Option<LogLevel> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(LogLevel::Error),
        "warn" | "warning" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}
