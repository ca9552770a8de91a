//! Ownreview Git
//!
//! Version-control plumbing for ownership-driven reviewer assignment.
//!
//! The crate provides:
//! - **Command execution**: [`GitRunner`] and its process-backed implementation [`SystemGit`]
//! - **Snapshots**: [`SnapshotManager`] reads a revision's tree into a private,
//!   disposable index so queries never touch the repository's own index
//! - **Attribute queries**: [`AttributeQuery`] reads the `owners` attribute of a
//!   path against a snapshot
//! - **Change enumeration**: [`GitDiffChanges`] streams the paths changed between
//!   two revisions
//!
//! # Examples
//!
//! ```no_run
//! use ownreview_domain::Repository;
//! use ownreview_git::{AttributeQuery, SnapshotManager, SystemGit};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Repository::new(1, "proj/repo", "/srv/git/repo.git");
//! let snapshots = SnapshotManager::new(SystemGit::default());
//! let attributes = AttributeQuery::new(SystemGit::default(), "owners");
//!
//! let snapshot = snapshots.acquire(&repo, "4f2c1e0")?;
//! let owners = attributes.owners_for(&repo, &snapshot, "src/main.rs")?;
//! snapshot.release();
//! println!("{:?}", owners);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod attributes;
mod command;
mod diff;
mod error;
mod snapshot;

pub use attributes::{parse_check_attr, AttributeQuery, DEFAULT_ATTRIBUTE};
pub use command::{GitCommand, GitOutput, GitRunner, SystemGit, GIT_INDEX_FILE};
pub use diff::GitDiffChanges;
pub use error::GitError;
pub use snapshot::{IndexSnapshot, SnapshotManager, DEFAULT_SNAPSHOT_PREFIX};
