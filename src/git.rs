//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution, optional timeouts and error formatting.
//! The rest of the crate talks to git through the [`Git`] trait so that
//! the pipeline can be driven by a stub in tests.

use crate::config::Config;
use crate::constants::TIMEOUT_POLL_MS;
use anyhow::Context;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Runs `git <args>` inside `repo` and returns stdout followed by stderr.
///
/// Fails when git cannot be spawned, exits non-zero, or outlives
/// `config.timeout`. A timed-out child is killed and reaped, and so is one
/// whose status can no longer be polled.
pub fn run_git(repo: &Path, config: &Config, args: &[&str]) -> anyhow::Result<String> {
    let command = args.join(" ");
    tracing::debug!(repo = %repo.display(), "running: git {}", command);

    let mut child = Command::new("git")
        .current_dir(repo)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("Failed to spawn git command")?;

    // Drained off-thread so a chatty child never blocks on a full pipe.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match config.timeout {
        Some(limit) => match wait_timeout(&mut child, limit) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill_and_reap(&mut child);
                anyhow::bail!("git {} timed out after {}s", command, limit.as_secs());
            }
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(e);
            }
        },
        None => child.wait().context("Failed to wait for git command")?,
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();

    let mut combined = String::from_utf8_lossy(&stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&stderr));
    tracing::debug!(repo = %repo.display(), "output: {:?}", combined);

    if status.success() {
        Ok(combined)
    } else {
        tracing::debug!(repo = %repo.display(), "git {} exited with {}", command, status);
        anyhow::bail!(
            "git {} failed: {}",
            command,
            String::from_utf8_lossy(&stderr).trim()
        )
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Kills `git` itself. Processes it started (ssh, hooks, shell aliases) are
/// not in its own process group and keep running until they exit on their own;
/// their pipes are left to the detached drain threads.
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Polls the child until it exits or `timeout` elapses (`Ok(None)`).
fn wait_timeout(child: &mut Child, timeout: Duration) -> anyhow::Result<Option<ExitStatus>> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(TIMEOUT_POLL_MS);

    loop {
        if let Some(status) = child.try_wait().context("Failed to wait for git command")? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        std::thread::sleep(poll_interval);
    }
}

/// The three git queries the pull pipeline depends on.
///
/// Implementations must be shareable across the worker threads.
pub trait Git: Sync {
    /// Raw output of `git rev-parse --is-inside-work-tree`.
    fn is_inside_work_tree(&self, repo: &Path) -> anyhow::Result<String>;

    /// Raw output of `git status --porcelain`. Empty means clean.
    fn status_porcelain(&self, repo: &Path) -> anyhow::Result<String>;

    /// `git pull --ff-only`.
    fn pull_ff_only(&self, repo: &Path) -> anyhow::Result<()>;
}

/// [`Git`] backed by the `git` executable on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit {
    config: Config,
}

impl SystemGit {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Git for SystemGit {
    fn is_inside_work_tree(&self, repo: &Path) -> anyhow::Result<String> {
        run_git(repo, &self.config, &["rev-parse", "--is-inside-work-tree"])
            .context("Failed to query work tree")
    }

    fn status_porcelain(&self, repo: &Path) -> anyhow::Result<String> {
        run_git(repo, &self.config, &["status", "--porcelain"])
            .context("Failed to check for uncommitted changes")
    }

    fn pull_ff_only(&self, repo: &Path) -> anyhow::Result<()> {
        run_git(repo, &self.config, &["pull", "--ff-only"]).context("Failed to pull from remote")?;
        Ok(())
    }
}
