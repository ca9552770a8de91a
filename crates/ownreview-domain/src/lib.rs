//! Ownreview Domain Layer
//!
//! Core model and host-boundary traits for ownership-driven reviewer
//! assignment. A proposal (pull request) is checked file by file: the
//! `owners` attribute of every changed path names the accounts that should
//! review it.
//!
//! ## Key Concepts
//!
//! - **Proposal**: a change under review (target revision, source revision, author)
//! - **Changed File**: a repository-relative path touched by the proposal
//! - **Owner Declaration**: a raw name or email token taken from attribute metadata
//! - **User Account**: a resolved identity in the host's user directory
//! - **Reviewer Addition**: the outcome of asking the host to add a reviewer
//!
//! ## Architecture
//!
//! - No external crate dependencies beyond `uuid`
//! - Everything the host owns (diff streaming, user directory, permission
//!   elevation, reviewer storage) is reached through the traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod change;
pub mod check;
pub mod identity;
pub mod proposal;
pub mod reviewer;
pub mod traits;

// Re-exports for convenience
pub use change::{ChangeSummary, ChangedFile};
pub use check::CheckId;
pub use identity::{OwnerDeclaration, Permission, UserAccount};
pub use proposal::{Proposal, Repository};
pub use reviewer::ReviewerAddition;
