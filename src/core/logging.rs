//! Logging initialisation.
//!
//! The terminal belongs to the TUI, so everything goes to a JSON log file in
//! the app data directory. Standard `log` macros are bridged into `tracing`
//! so both styles land in the same file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

const LOG_PREFIX: &str = "zr-report-desk";
/// Daily files kept before the oldest is deleted.
const MAX_LOG_FILES: usize = 14;

/// Directory log files are written to.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("zr-report-desk").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn file_appender(log_dir: &Path) -> RollingFileAppender {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .unwrap_or_else(|e| {
            eprintln!("Failed to configure log rotation: {e}");
            rolling::daily(log_dir, format!("{LOG_PREFIX}.log"))
        })
}

/// Initialize logging for TUI mode (file only, no stdout layer).
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered lines are flushed on shutdown.
pub fn init_tui() -> WorkerGuard {
    let log_dir = log_dir();
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(&log_dir));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter);

    let subscriber = tracing_subscriber::registry().with(file_layer);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    log::info!("Logging initialized. Writing to: {:?}", log_dir);

    guard
}
