//! Test infrastructure for gp integration tests.
#![allow(dead_code)]

use anyhow::Result;
use gp::config::Config;
use gp::git::run_git;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn test_config() -> Config {
    Config::default()
}

fn git(dir: &Path, args: &[&str]) -> Result<String> {
    run_git(dir, &test_config(), args)
}

fn set_identity(path: &Path) -> Result<()> {
    git(path, &["config", "user.email", "test@example.com"])?;
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Initializes a repository at `path` with one commit on `branch`.
pub fn init_repo(path: &Path, branch: &str) -> Result<()> {
    std::fs::create_dir_all(path)?;
    git(path, &["init", "-b", branch])?;
    set_identity(path)?;
    commit_file(path, "README.md", "# Test Repo\n", "Initial commit")
}

pub fn commit_file(path: &Path, file: &str, contents: &str, message: &str) -> Result<()> {
    std::fs::write(path.join(file), contents)?;
    git(path, &["add", file])?;
    git(path, &["commit", "-m", message])?;
    Ok(())
}

pub fn head(path: &Path) -> Result<String> {
    Ok(git(path, &["rev-parse", "HEAD"])?.trim().to_string())
}

/// A standalone temporary repository without a remote.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        init_repo(&path, "master")?;
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn make_dirty(&self) -> Result<()> {
        std::fs::write(self.path.join("README.md"), "# Modified\n")?;
        Ok(())
    }

    pub fn make_untracked(&self) -> Result<()> {
        std::fs::write(self.path.join("untracked.txt"), "untracked content\n")?;
        Ok(())
    }
}

/// A bare remote plus a private clone used to publish new commits to it.
pub struct Upstream {
    remote: TempDir,
    publisher: TempDir,
}

impl Upstream {
    pub fn new() -> Result<Self> {
        let remote = TempDir::new()?;
        git(remote.path(), &["init", "--bare", "-b", "master"])?;

        let publisher = TempDir::new()?;
        init_repo(publisher.path(), "master")?;
        git(
            publisher.path(),
            &["remote", "add", "origin", &remote.path().to_string_lossy()],
        )?;
        git(publisher.path(), &["push", "-u", "origin", "master"])?;

        Ok(Self { remote, publisher })
    }

    /// Clones the remote into `dest`, which must not exist yet.
    pub fn clone_into(&self, dest: &Path) -> Result<()> {
        let parent = dest.parent().expect("clone destination has a parent");
        git(
            parent,
            &[
                "clone",
                &self.remote.path().to_string_lossy(),
                &dest.to_string_lossy(),
            ],
        )?;
        set_identity(dest)
    }

    /// Pushes a new commit so that every existing clone falls one behind.
    pub fn publish(&self, file: &str, contents: &str) -> Result<()> {
        commit_file(self.publisher.path(), file, contents, "Upstream change")?;
        git(self.publisher.path(), &["push", "origin", "master"])?;
        Ok(())
    }

    pub fn head(&self) -> Result<String> {
        head(self.publisher.path())
    }
}

/// Builds the reference workspace:
/// - `repoA`: clean, one commit behind its remote
/// - `repoB`: behind as well, but with a modified tracked file
/// - `notes`: a plain directory
pub fn setup_mixed_workspace(workspace: &Path) -> Result<Upstream> {
    let upstream = Upstream::new()?;
    upstream.clone_into(&workspace.join("repoA"))?;
    upstream.clone_into(&workspace.join("repoB"))?;
    std::fs::create_dir_all(workspace.join("notes"))?;

    upstream.publish("CHANGELOG.md", "## 0.2.0\n")?;
    std::fs::write(workspace.join("repoB").join("README.md"), "# Local edit\n")?;

    Ok(upstream)
}
