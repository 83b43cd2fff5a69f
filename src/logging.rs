//! Tracing subscriber setup.
//!
//! Standard output belongs to the menu, so events are written to stderr or,
//! when `logging.directory` is configured, to a daily rolling file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "elidune-desk.log";

/// Install the global subscriber.
///
/// The returned guard flushes buffered events on drop and must be held for
/// the lifetime of the program.
pub fn init(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("elidune_desk={}", config.level).into());

    let (writer, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };
    let ansi = config.directory.is_none();

    let registry = tracing_subscriber::registry().with(filter);
    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_ansi(ansi).with_writer(writer))
            .try_init()?;
    }

    Ok(guard)
}
