//! Changed files produced by a proposal's diff

use std::fmt;
use std::path::PathBuf;

/// A file touched by the proposal, relative to the repository root
///
/// The path is kept as the platform path git reported, so names that are not
/// valid UTF-8 still reach attribute queries unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangedFile {
    /// Repository-relative path
    pub path: PathBuf,
}

impl ChangedFile {
    /// Create a changed file entry
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for ChangedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Summary delivered once an enumeration pass ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Number of files handed to the consumer
    pub delivered: usize,

    /// The consumer asked to stop before the diff was exhausted
    pub stopped_early: bool,
}
