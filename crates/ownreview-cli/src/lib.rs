//! Ownreview CLI library.
//!
//! Runs the reviewer assigner against a local repository, standing in for a
//! review host: users come from a TOML file, reviewers are kept in memory and
//! printed at the end.

pub mod cli;
pub mod commands;
pub mod error;
pub mod host;
pub mod output;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
