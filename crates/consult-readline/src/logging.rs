//! Tracing setup for the console binary.
//!
//! Diagnostics go to stderr, filtered to `warn` unless `RUST_LOG` or
//! `--log-level` says otherwise. `--log-file` adds a daily-rolling file
//! under `~/.config/consult/logs`.

use anyhow::{Context, Result};
use consult_infrastructure::ConsultPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber.
///
/// The returned guard must live until exit so buffered file output is flushed.
pub fn init(level: Option<&str>, log_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log level '{directives}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let (file_layer, guard) = if log_file {
        let logs_dir = ConsultPaths::logs_dir()?;
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("failed to create {}", logs_dir.display()))?;
        let appender = tracing_appender::rolling::daily(logs_dir, "consult.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
