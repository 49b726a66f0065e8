//! Logging and tracing utilities

use crate::{LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_filter))
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`LogConfig::default_filter`]. Logs go to
/// stderr so that stdout stays reserved for command output.
pub fn init_tracing(config: &LogConfig) {
    // A subscriber installed earlier (tests, embedding binaries) wins.
    let _ = try_init_tracing(config);
}

/// Like [`init_tracing`] but reports whether a global subscriber was already set.
pub fn try_init_tracing(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}
