// Repository detection, the clean-then-pull worker, and the fan-out dispatcher

use crate::git::Git;
use anyhow::Context;
use rayon::prelude::*;
use std::ffi::OsStr;
use std::fmt;
use std::fs::DirEntry;
use std::path::{Component, Path, PathBuf};

/// What happened to a single repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RepositoryState {
    Updated = 0,
    Skipped = 1,
    PullFailed = 2,
}

impl RepositoryState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RepositoryState::Updated => "updated",
            RepositoryState::Skipped => "skipped (dirty)",
            RepositoryState::PullFailed => "pull failed",
        }
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(RepositoryState::Updated),
            1 => Some(RepositoryState::Skipped),
            2 => Some(RepositoryState::PullFailed),
            _ => None,
        }
    }

    /// Label for a raw state code, `"?"` when the code maps to no state.
    #[must_use]
    pub fn label_for_code(code: u8) -> &'static str {
        Self::from_code(code).map_or("?", Self::label)
    }
}

impl fmt::Display for RepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the report. Produced exactly once per confirmed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub path: PathBuf,
    pub state: RepositoryState,
}

/// Receives each outcome as the dispatcher collects it.
pub trait PullCallbacks {
    fn on_complete(&self, outcome: &Outcome);
}

/// Whether `path` is inside a git work tree. Any failure counts as "no".
pub fn is_repository(git: &dyn Git, path: &Path) -> bool {
    match git.is_inside_work_tree(path) {
        Ok(output) => output.trim() == "true",
        Err(e) => {
            tracing::debug!(path = %path.display(), "not a repository: {:#}", e);
            false
        }
    }
}

/// Pulls `path` with `--ff-only` if, and only if, its work tree is clean.
pub fn pull_if_clean(git: &dyn Git, path: &Path) -> Outcome {
    let state = match git.status_porcelain(path) {
        Err(e) => {
            tracing::debug!("repo {} not clean with error: {:#}", path.display(), e);
            RepositoryState::Skipped
        }
        Ok(status) if !status.is_empty() => {
            tracing::debug!("repo {} not clean", path.display());
            RepositoryState::Skipped
        }
        Ok(_) => match git.pull_ff_only(path) {
            Ok(()) => RepositoryState::Updated,
            Err(e) => {
                tracing::debug!("repo {} failed to git pull with error: {:#}", path.display(), e);
                RepositoryState::PullFailed
            }
        },
    };

    Outcome {
        path: path.to_path_buf(),
        state,
    }
}

/// Immediate subdirectories of `root` that are git work trees.
///
/// Listing `root` is the only fatal error in the pipeline. Entries that
/// cannot be read are skipped, as are non-directory entries (symlinks
/// included), without probing.
pub fn find_repositories(root: &Path, git: &dyn Git) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("Failed to read directory {}", root.display()))?;

    let dirs: Vec<PathBuf> = entries
        .filter_map(|entry| listed_dir(root, entry))
        .collect();

    Ok(dirs
        .into_par_iter()
        .filter(|path| is_repository(git, path))
        .collect())
}

/// Path of a listed entry if it is a directory.
fn listed_dir(root: &Path, entry: std::io::Result<DirEntry>) -> Option<PathBuf> {
    let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
            tracing::debug!("skipping unreadable entry in {}: {}", root.display(), e);
            return None;
        }
    };
    match entry.file_type() {
        Ok(file_type) if file_type.is_dir() => {
            let path = join_clean(root, &entry.file_name());
            tracing::debug!("processing path: {}", path.display());
            Some(path)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("skipping {}: {}", entry.path().display(), e);
            None
        }
    }
}

/// Joins `name` onto `root` and cleans the result lexically.
///
/// `.` components are dropped and `..` cancels the preceding name, so a
/// root of `.` yields just `name`. Nothing touches the filesystem.
pub fn join_clean(root: &Path, name: &OsStr) -> PathBuf {
    let joined = root.join(name);
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}

/// Runs [`pull_if_clean`] for every repository concurrently.
///
/// One thread per repository, no cap. Each worker hands its outcome over an
/// unbuffered channel; the caller thread receives exactly `repos.len()` times
/// and returns outcomes in completion order.
pub fn pull_workspace<C>(repos: &[PathBuf], git: &dyn Git, callbacks: &C) -> Vec<Outcome>
where
    C: PullCallbacks + ?Sized,
{
    let (tx, rx) = crossbeam_channel::bounded::<Outcome>(0);

    std::thread::scope(|scope| {
        for path in repos {
            let tx = tx.clone();
            scope.spawn(move || {
                // The receiver only goes away if the dispatcher panicked.
                let _ = tx.send(pull_if_clean(git, path));
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(repos.len());
        for _ in 0..repos.len() {
            match rx.recv() {
                Ok(outcome) => {
                    callbacks.on_complete(&outcome);
                    outcomes.push(outcome);
                }
                Err(_) => break,
            }
        }
        outcomes
    })
}
