//! Runtime configuration read from the environment.

use crate::constants::{DEBUG_ENV, TIMEOUT_ENV};
use std::time::Duration;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Trace every git invocation and its raw output to stdout.
    pub debug: bool,
    /// Upper bound for a single git command. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            debug: parse_debug(std::env::var(DEBUG_ENV).ok().as_deref()),
            timeout: parse_timeout(std::env::var(TIMEOUT_ENV).ok().as_deref()),
        }
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }
}

/// Debug mode is on only when the value is an integer equal to 1.
#[must_use]
pub fn parse_debug(value: Option<&str>) -> bool {
    value.and_then(|v| v.parse::<i64>().ok()) == Some(1)
}

/// Parses a positive number of seconds. Zero and garbage mean no timeout.
#[must_use]
pub fn parse_timeout(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
