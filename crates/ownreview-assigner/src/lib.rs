//! Ownreview Assigner
//!
//! Adds the declared owners of a proposal's changed files as its reviewers.
//!
//! # Overview
//!
//! For every check the assigner:
//! - **Snapshots** the proposal's source revision into a private index
//! - **Enumerates** the changed files through the host's [`ChangeSource`]
//! - **Queries** the `owners` attribute of each file against the snapshot
//! - **Resolves** every owner token to an account under an elevated permission
//! - **Assigns** each resolved account as reviewer, once per check
//!
//! # Failure policy
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Snapshot creation | check aborted, logged as error |
//! | Attribute query | file skipped, logged as error |
//! | Unknown owner | token skipped, logged as warning |
//! | Directory lookup | token skipped, logged as error |
//! | Author as reviewer | ignored |
//! | Reviewer storage | retried `assignment_retries` times, then logged as error |
//! | Snapshot removal | logged as warning |
//!
//! A check never returns an error to the host; see [`CheckReport`] for what
//! happened.
//!
//! # Configuration
//!
//! ```toml
//! attribute_name = "owners"
//! lookup_permission = "repo_admin"
//! max_changed_files = 1000
//! assignment_retries = 0
//! dry_run = false
//! ```
//!
//! [`ChangeSource`]: ownreview_domain::traits::ChangeSource

#![warn(missing_docs)]

mod assigner;
mod config;
mod error;
mod report;
mod resolver;

pub use assigner::ReviewerAssigner;
pub use config::{AssignerConfig, ConfigError};
pub use error::{AssignerError, ResolveError};
pub use report::{AssignmentOutcome, CheckReport, ReviewerRecord};
pub use resolver::IdentityResolver;
