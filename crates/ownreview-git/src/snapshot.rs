//! Disposable index snapshots of a revision's tree

use std::path::{Path, PathBuf};

use ownreview_domain::Repository;
use tempfile::TempDir;

use crate::{GitCommand, GitError, GitRunner, GIT_INDEX_FILE};

/// File-name prefix for snapshot directories
pub const DEFAULT_SNAPSHOT_PREFIX: &str = "git_idx_";

/// Creates private index files holding a revision's tree
///
/// The repository's own index and working tree are never written: git is
/// pointed at the snapshot through `GIT_INDEX_FILE`.
///
/// # Examples
///
/// ```no_run
/// use ownreview_domain::Repository;
/// use ownreview_git::{SnapshotManager, SystemGit};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = Repository::new(1, "proj/repo", "/srv/git/repo.git");
/// let manager = SnapshotManager::new(SystemGit::default()).with_prefix("ownreview_");
///
/// let snapshot = manager.acquire(&repo, "HEAD")?;
/// println!("index at {}", snapshot.index_path().display());
/// snapshot.release();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotManager<G> {
    git: G,
    dir: Option<PathBuf>,
    prefix: String,
}

impl<G: GitRunner> SnapshotManager<G> {
    /// Create a manager that places snapshots in the system temp directory
    pub fn new(git: G) -> Self {
        Self {
            git,
            dir: None,
            prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
        }
    }

    /// Place snapshots under `dir` instead of the system temp directory
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Use a different file-name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Read the tree of `revision` into a fresh, uniquely named index
    ///
    /// On failure whatever was created is removed before the error returns.
    pub fn acquire(
        &self,
        repository: &Repository,
        revision: &str,
    ) -> Result<IndexSnapshot, GitError> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix(&self.prefix);
            builder
        };
        let dir = match &self.dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| GitError::SnapshotCreation {
            revision: revision.to_string(),
            reason: e.to_string(),
        })?;

        let snapshot = IndexSnapshot::new(dir);
        let command = GitCommand::new("read-tree")
            .arg(revision)
            .env(GIT_INDEX_FILE, snapshot.index_path());

        // On error `snapshot` is dropped here, which removes the directory.
        let output = self
            .git
            .run(repository, &command)
            .map_err(|e| GitError::SnapshotCreation {
                revision: revision.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(line) = output.single_line() {
            tracing::debug!("read-tree {}: {}", revision, line);
        }
        tracing::debug!(
            "Snapshot of {} ready at {}",
            revision,
            snapshot.index_path().display()
        );

        Ok(snapshot)
    }
}

/// A disposable index holding one revision's tree
///
/// Owned by exactly one check. The backing directory is removed by
/// [`IndexSnapshot::release`] or, failing that, when the snapshot is dropped.
/// Removal errors are logged, never returned.
#[derive(Debug)]
pub struct IndexSnapshot {
    dir: Option<TempDir>,
    index_path: PathBuf,
}

impl IndexSnapshot {
    fn new(dir: TempDir) -> Self {
        let index_path = dir.path().join("index");
        Self {
            dir: Some(dir),
            index_path,
        }
    }

    /// Path to hand to git as `GIT_INDEX_FILE`
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Remove the snapshot from disk
    pub fn release(mut self) {
        self.discard();
    }

    fn discard(&mut self) {
        if let Some(dir) = self.dir.take() {
            let location = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => tracing::debug!("Removed index snapshot {}", location.display()),
                Err(e) => tracing::warn!(
                    "Failed to remove index snapshot {}: {}",
                    location.display(),
                    e
                ),
            }
        }
    }
}

impl Drop for IndexSnapshot {
    fn drop(&mut self) {
        self.discard();
    }
}
