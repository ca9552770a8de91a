//! Proposal module - the change under review

use std::path::PathBuf;

/// A repository hosted by the review system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Host-assigned repository id
    pub id: u64,

    /// Human readable slug (e.g. "project/repo")
    pub slug: String,

    /// Location of the git repository on disk (bare or non-bare)
    pub path: PathBuf,
}

impl Repository {
    /// Create a repository reference
    pub fn new(id: u64, slug: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            slug: slug.into(),
            path: path.into(),
        }
    }
}

/// A proposal to merge a source revision into a target revision
///
/// Immutable for the duration of a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Host-assigned proposal id, unique within the target repository
    pub id: u64,

    /// Repository the proposal targets
    pub repository: Repository,

    /// Target (base) revision
    pub target_revision: String,

    /// Latest commit of the source ref
    pub source_revision: String,

    /// Account name of the proposal's author
    pub author: String,
}

impl Proposal {
    /// Create a new proposal
    pub fn new(
        id: u64,
        repository: Repository,
        target_revision: impl Into<String>,
        source_revision: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id,
            repository,
            target_revision: target_revision.into(),
            source_revision: source_revision.into(),
            author: author.into(),
        }
    }

    /// Whether the given account name is the proposal's author
    pub fn is_author(&self, account_name: &str) -> bool {
        self.author == account_name
    }
}
