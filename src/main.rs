use clap::Parser;
use gp::config::Config;
use gp::constants::DEFAULT_ROOT;
use gp::git::SystemGit;
use gp::{logging, output, repo};
use std::path::PathBuf;

/// Fast-forward pull every clean git repository directly under a directory.
#[derive(Parser, Debug)]
#[command(name = "gp", version, about)]
struct Cli {
    /// Directory whose immediate subdirectories are scanned
    #[arg(default_value = DEFAULT_ROOT)]
    root: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    logging::init(&config);

    let git = SystemGit::new(config);
    let repos = repo::find_repositories(&cli.root, &git)?;

    let progress = output::create_workspace_progress(repos.len(), &config);
    let outcomes = repo::pull_workspace(&repos, &git, &progress);
    progress.finish();

    output::print_report(&outcomes);
    Ok(())
}
