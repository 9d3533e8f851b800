//! Process-wide tracing setup.

use crate::config::Config;
use tracing::level_filters::LevelFilter;

/// Installs the global subscriber when debug mode is on.
///
/// Traces go to stdout so they interleave with the report, matching what a
/// user sees when running with `DEBUG=1`. With debug off nothing is installed
/// and every `tracing` macro is a no-op.
pub fn init(config: &Config) {
    if !config.is_debug() {
        return;
    }

    if tracing::subscriber::set_global_default(debug_subscriber()).is_ok() {
        tracing::debug!("debug mode enabled");
    }
}

fn debug_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_writer(std::io::stdout)
        .with_target(false)
        .finish()
}
