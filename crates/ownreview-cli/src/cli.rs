//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ownreview - add file owners as reviewers of a change.
#[derive(Debug, Parser)]
#[command(name = "ownreview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: CliFormat,

    /// Assigner configuration file (TOML)
    #[arg(short, long, global = true, env = "OWNREVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human readable text (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assign owners of the files changed between two revisions
    Check(CheckArgs),

    /// Show the declared owners of paths at a revision
    Owners(OwnersArgs),
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Repository path
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Target (base) revision
    #[arg(short, long)]
    pub target: String,

    /// Source revision holding the proposed changes
    #[arg(short, long)]
    pub source: String,

    /// Account name of the change's author
    #[arg(short, long)]
    pub author: String,

    /// Users file (TOML list of [[users]] with name and email)
    #[arg(short, long)]
    pub users: PathBuf,

    /// Proposal id to report
    #[arg(long, default_value = "1")]
    pub proposal_id: u64,

    /// Resolve owners without adding reviewers
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the owners command.
#[derive(Debug, Parser)]
pub struct OwnersArgs {
    /// Repository path
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Revision whose attributes are read
    #[arg(long, default_value = "HEAD")]
    pub rev: String,

    /// Paths to look up
    #[arg(required = true)]
    pub paths: Vec<String>,
}
