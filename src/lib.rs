//! Fast-forward pull for a directory of git checkouts.
//!
//! This crate scans the immediate subdirectories of a root and, for each one
//! that is a git work tree:
//! - Checks that the work tree is clean (`git status --porcelain`)
//! - Pulls it with `git pull --ff-only` when it is
//! - Reports `updated`, `skipped (dirty)` or `pull failed`

pub mod config;
pub mod constants;
pub mod git;
pub mod logging;
pub mod output;
pub mod repo;
