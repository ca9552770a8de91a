//! Error types for git operations

use thiserror::Error;

/// Errors that can occur while running git
#[derive(Error, Debug)]
pub enum GitError {
    /// The git binary could not be started
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// git ran but exited unsuccessfully
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The disposable index for a revision could not be created
    #[error("Snapshot creation failed for revision {revision}: {reason}")]
    SnapshotCreation {
        /// Revision that was being read
        revision: String,
        /// Description of the failure
        reason: String,
    },

    /// An attribute query could not be executed
    #[error("Attribute query failed for {path}: {reason}")]
    QueryExecution {
        /// Path being queried
        path: String,
        /// Description of the failure
        reason: String,
    },

    /// git produced output that could not be interpreted
    #[error("Invalid git output: {0}")]
    InvalidOutput(String),

    /// I/O error while talking to git
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
