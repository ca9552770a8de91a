//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ownreview_assigner::ConfigError),

    /// Assigner construction error
    #[error("Assigner error: {0}")]
    Assigner(#[from] ownreview_assigner::AssignerError),

    /// Git error
    #[error("Git error: {0}")]
    Git(#[from] ownreview_git::GitError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The check ended before visiting every changed file
    #[error("Check aborted: {0}")]
    Aborted(String),
}
