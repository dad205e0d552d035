use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_LEVEL_ENV: &str = "DUESORT_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Logs to stderr; used by the one-shot commands.
pub fn init_stderr(configured: Option<&str>) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(build_log_filter(configured))
        .with(layer)
        .try_init();
}

/// Logs to a timestamped file, since the preview owns the terminal.
pub fn init_file(configured: Option<&str>) -> Result<PathBuf> {
    let log_dir = log_directory().context("Failed to determine local data directory")?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_file_path = log_file_path(&log_dir);
    let file = fs::File::create(&log_file_path)
        .with_context(|| format!("Failed to create log file {}", log_file_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // The writer thread must live as long as the process.
    std::mem::forget(guard);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(build_log_filter(configured))
        .with(file_layer)
        .try_init();

    tracing::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(log_file_path)
}

fn build_log_filter(configured: Option<&str>) -> EnvFilter {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|raw| normalize_log_level(&raw))
        .or_else(|| configured.and_then(normalize_log_level))
        .unwrap_or(DEFAULT_LEVEL);
    EnvFilter::new(format!("{level},duesort={level}"))
}

fn normalize_log_level(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

pub fn log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("duesort").join("logs"))
}

pub fn log_file_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    log_dir.join(format!("duesort-{timestamp}.log"))
}
