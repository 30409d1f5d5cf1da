//! Logging setup
//!
//! Installs the global tracing subscriber: stdout always, plus an optional log file.

use std::path::Path;

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "pokemon_service=info,tower_http=info";

/// Initializes the tracing subscriber.
///
/// Defaults to [`DEFAULT_FILTER`], overridable with `RUST_LOG`. When
/// `log_file` is set, events are also written there without ANSI colors.
/// The returned guard must be kept alive to flush the file writer.
pub fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}
