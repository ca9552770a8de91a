//! Ownreview CLI - assign file owners as reviewers of a local change.

use anyhow::Context;
use clap::Parser;
use ownreview_assigner::AssignerConfig;
use ownreview_cli::{commands, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AssignerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AssignerConfig::default(),
    };

    let formatter = Formatter::new(cli.format.into());

    match cli.command {
        Command::Check(args) => commands::execute_check(args, config, &formatter)?,
        Command::Owners(args) => commands::execute_owners(args, &config, &formatter)?,
    }

    Ok(())
}
