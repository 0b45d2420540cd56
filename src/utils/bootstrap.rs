//! Bootstrap utilities for the tallyd binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the TALLY_LOG environment variable.
///
/// Defaults to "info" level if TALLY_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// First CLI argument, treated as a configuration file path.
pub fn parse_config_path() -> Option<String> {
    std::env::args().nth(1)
}
