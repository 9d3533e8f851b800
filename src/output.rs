//! Report table and progress display.
//!
//! The report goes to stdout as a two-column table. While workers run, a
//! progress bar is drawn on stderr unless debug tracing owns the terminal.

use crate::config::Config;
use crate::constants::{COLUMN_PADDING, PROGRESS_TICK_MS};
use crate::repo::{Outcome, PullCallbacks, RepositoryState};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// No-op callbacks for when progress tracking is not needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl PullCallbacks for NoOpCallbacks {
    fn on_complete(&self, _outcome: &Outcome) {}
}

/// Progress bar counting finished repositories.
pub struct WorkspaceProgress {
    bar: ProgressBar,
}

impl WorkspaceProgress {
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PullCallbacks for WorkspaceProgress {
    fn on_complete(&self, outcome: &Outcome) {
        self.bar.inc(1);
        if outcome.state == RepositoryState::PullFailed {
            self.bar.set_message(format!("│ {}", outcome.path.display()).red().to_string());
        }
    }
}

/// Creates a progress bar for `total` repositories.
/// Returns a hidden bar in debug mode so traces are not overdrawn.
#[must_use]
pub fn create_workspace_progress(total: usize, config: &Config) -> WorkspaceProgress {
    let bar = if config.is_debug() || total == 0 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} pulled {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░"),
        );
        bar.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        bar
    };

    WorkspaceProgress { bar }
}

/// Renders outcomes as an aligned two-column table, one line per outcome.
///
/// Rows keep the order they were given in.
#[must_use]
pub fn render_table(outcomes: &[Outcome]) -> String {
    render_rows(outcomes, |state| state.label().to_string())
}

/// Prints the report to stdout with colored state labels.
pub fn print_report(outcomes: &[Outcome]) {
    print!("{}", render_rows(outcomes, |state| colorize(state).to_string()));
}

fn render_rows<F>(outcomes: &[Outcome], label: F) -> String
where
    F: Fn(RepositoryState) -> String,
{
    let paths: Vec<String> = outcomes
        .iter()
        .map(|o| o.path.display().to_string())
        .collect();
    let width = paths.iter().map(|p| p.chars().count()).max().unwrap_or(0) + COLUMN_PADDING;

    paths
        .iter()
        .zip(outcomes)
        .map(|(path, outcome)| format!("{:<width$}{}\n", path, label(outcome.state)))
        .collect()
}

fn colorize(state: RepositoryState) -> ColoredString {
    match state {
        RepositoryState::Updated => state.label().green(),
        RepositoryState::Skipped => state.label().yellow(),
        RepositoryState::PullFailed => state.label().red(),
    }
}
