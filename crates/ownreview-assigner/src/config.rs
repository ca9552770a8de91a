//! Configuration for reviewer assignment

use std::path::{Path, PathBuf};

use ownreview_domain::Permission;
use ownreview_git::{DEFAULT_ATTRIBUTE, DEFAULT_SNAPSHOT_PREFIX};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or malformed
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Configuration for the reviewer assigner
///
/// Every key is optional in TOML; missing keys take their default.
///
/// # Examples
///
/// ```
/// use ownreview_assigner::AssignerConfig;
///
/// let config = AssignerConfig::default();
/// assert_eq!(config.attribute_name, "owners");
/// assert!(!config.dry_run);
///
/// let config = AssignerConfig::from_toml_str("dry_run = true\nmax_changed_files = 500").unwrap();
/// assert_eq!(config.max_changed_files, Some(500));
/// ```
///
/// ```toml
/// attribute_name = "owners"
/// lookup_permission = "repo_admin"
/// lookup_reason = "Find user"
/// snapshot_dir = "/var/tmp/ownreview"
/// snapshot_prefix = "git_idx_"
/// max_changed_files = 1000
/// assignment_retries = 0
/// dry_run = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignerConfig {
    /// Attribute holding the owner list
    /// Default: "owners"
    pub attribute_name: String,

    /// Permission the user lookup is elevated to
    /// Default: "repo_admin"
    pub lookup_permission: String,

    /// Description handed to the security service with each elevation
    /// Default: "Find user"
    pub lookup_reason: String,

    /// Directory for snapshot indexes; system temp directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,

    /// File-name prefix of snapshot directories
    /// Default: "git_idx_"
    pub snapshot_prefix: String,

    /// Stop enumerating after this many changed files; unlimited when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_changed_files: Option<usize>,

    /// Extra attempts for a reviewer addition that failed in storage
    /// Default: 0
    pub assignment_retries: u32,

    /// Resolve owners and report them without adding reviewers
    /// Default: false
    pub dry_run: bool,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            attribute_name: DEFAULT_ATTRIBUTE.to_string(),
            lookup_permission: Permission::RepoAdmin.as_str().to_string(),
            lookup_reason: "Find user".to_string(),
            snapshot_dir: None,
            snapshot_prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            max_changed_files: None,
            assignment_retries: 0,
            dry_run: false,
        }
    }
}

impl AssignerConfig {
    /// Default configuration with `dry_run` enabled
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AssignerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attribute_name.is_empty()
            || self.attribute_name.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Invalid {
                field: "attribute_name",
                reason: format!("{:?} is not a valid attribute name", self.attribute_name),
            });
        }

        self.permission()?;

        if self.snapshot_prefix.contains(std::path::is_separator) {
            return Err(ConfigError::Invalid {
                field: "snapshot_prefix",
                reason: "must not contain path separators".to_string(),
            });
        }

        if self.max_changed_files == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_changed_files",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// The lookup permission as a typed value
    pub fn permission(&self) -> Result<Permission, ConfigError> {
        Permission::parse(&self.lookup_permission).ok_or_else(|| ConfigError::Invalid {
            field: "lookup_permission",
            reason: format!("unknown permission {:?}", self.lookup_permission),
        })
    }
}
