//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic numbers throughout the codebase.

/// Environment variable that enables debug tracing when set to `1`.
pub const DEBUG_ENV: &str = "DEBUG";

/// Environment variable holding an optional per-command git timeout (in seconds).
///
/// Unset means git commands may run for as long as they need.
///
/// Example: `GP_TIMEOUT=60 gp ~/src`
pub const TIMEOUT_ENV: &str = "GP_TIMEOUT";

/// Directory scanned when no root argument is given.
pub const DEFAULT_ROOT: &str = ".";

/// How often a running git child is polled while a timeout is in effect.
pub const TIMEOUT_POLL_MS: u64 = 50;

/// Progress bar tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Spaces between the path column and the state column of the report.
pub const COLUMN_PADDING: usize = 2;
