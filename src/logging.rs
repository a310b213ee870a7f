//! Logging configuration for faqrag

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::AppConfig;
use crate::Result;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "faqrag.log";

/// Initialize logging from configuration.
///
/// Logs go to stderr (stdout belongs to the interactive shell) and, when
/// `logging.file` is set, to a daily rolling file under `logs/`. `verbose`
/// forces debug level. The returned guard flushes the file writer when
/// dropped, so keep it alive for the life of the process.
pub fn init_logging(config: &AppConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init_logging_with_level(level, config.logging.file)
}

/// Initialize logging with custom log level
pub fn init_logging_with_level(level: &str, to_file: bool) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,faqrag={level}")));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if !to_file {
        Registry::default()
            .with(env_filter)
            .with(console_layer)
            .init();
        tracing::debug!("Logging initialized with level: {}", level);
        return Ok(None);
    }

    let logs_dir = Path::new(LOG_DIR);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::debug!(
        "Logging initialized with level: {} - log files in {}/{}.YYYY-MM-DD",
        level,
        LOG_DIR,
        LOG_FILE
    );

    Ok(Some(guard))
}
