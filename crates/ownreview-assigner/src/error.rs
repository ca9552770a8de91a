//! Error types for reviewer assignment

use ownreview_git::GitError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can end a check early or prevent an assigner from being built
#[derive(Error, Debug)]
pub enum AssignerError {
    /// The snapshot of the source revision could not be created
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] GitError),

    /// The host could not enumerate the proposal's changes
    #[error("Change enumeration error: {0}")]
    Changes(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Why an owner token did not resolve to an account
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No account matches the token
    #[error("User not found by name or email: {0}")]
    NotFound(String),

    /// The directory lookup (or the elevation around it) failed
    #[error("Failed to look up user {token}: {reason}")]
    Lookup {
        /// Token being resolved
        token: String,
        /// Description of the failure
        reason: String,
    },
}
