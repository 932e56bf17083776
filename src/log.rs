use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::prelude::*;

use crate::config;

const LOG_FILE_NAME: &str = "release-updater.log";

/// Installs a JSON file logger under the data directory.
///
/// stdout carries command output, so nothing is logged there.
pub fn init() -> anyhow::Result<()> {
    let log_dir = config::log_dir();

    std::fs::create_dir_all(&log_dir).inspect_err(|e| {
        eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
    })?;

    let log_file = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(log_file)
        .fmt_fields(JsonFields::default());

    // Use RUST_LOG if set, otherwise default to INFO
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .try_init()?;

    Ok(())
}
