//! Tracing setup.

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub fn is_test_env() -> bool {
    std::env::var_os("SITREP_TESTING").is_some()
        || std::env::var_os("RUST_TEST_THREADS").is_some()
}

fn filter_for(verbosity: u8) -> EnvFilter {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins when set; the config verbosity is only the default.
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. Call once at process start; a second
/// call is ignored (tests share one process).
pub fn init(logging: &LoggingConfig) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter_for(logging.verbosity))
        .with_target(false)
        .finish()
        .try_init();
    if result.is_err() && !is_test_env() {
        tracing::debug!("telemetry already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let logging = LoggingConfig { verbosity: 2 };
        init(&logging);
        init(&logging);
    }
}
