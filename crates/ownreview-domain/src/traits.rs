//! Trait definitions for host interactions
//!
//! These traits define the boundaries between the assignment engine and the
//! review host. Implementations live in the host (or in `ownreview-git` and
//! `ownreview-cli` for local use).

use std::ops::ControlFlow;

use crate::{ChangeSummary, ChangedFile, Permission, Proposal, ReviewerAddition, UserAccount};

/// Trait for streaming the files changed by a proposal
///
/// Implemented by the host's diff service (or `ownreview_git::GitDiffChanges`)
pub trait ChangeSource {
    /// Error type for change streaming
    type Error;

    /// Deliver every changed file to `on_change`, one at a time, in diff order
    ///
    /// Returning `ControlFlow::Break(())` from the callback ends the pass
    /// without error. A fresh pass is requested for every check.
    fn stream_changes(
        &self,
        proposal: &Proposal,
        on_change: &mut dyn FnMut(&ChangedFile) -> ControlFlow<()>,
    ) -> Result<ChangeSummary, Self::Error>;
}

/// Trait for looking up user accounts
///
/// Implemented by the host's user directory
pub trait UserDirectory {
    /// Error type for directory operations
    type Error;

    /// Find a user whose account name or email equals `name_or_email`
    ///
    /// Returns `Ok(None)` when nobody matches.
    fn find_by_name_or_email(
        &self,
        name_or_email: &str,
    ) -> Result<Option<UserAccount>, Self::Error>;
}

/// Trait for running a call under an elevated permission
///
/// Implemented by the host's security service. The elevation lasts for the
/// duration of `op` only and is reverted whether `op` succeeds or fails.
pub trait SecurityService {
    /// Error type raised when elevation itself is refused
    type Error;

    /// Run `op` with `permission` granted, describing the call as `reason`
    fn with_permission<T, F>(
        &self,
        permission: Permission,
        reason: &str,
        op: F,
    ) -> Result<T, Self::Error>
    where
        F: FnOnce() -> T;
}

/// Trait for recording reviewers on proposals
///
/// Implemented by the host's proposal storage
pub trait ReviewerStore {
    /// Error type for storage failures
    type Error;

    /// Add `user_name` as a reviewer of proposal `proposal_id` in `repository_id`
    ///
    /// Adding an existing reviewer reports `AlreadyPresent`; adding the
    /// proposal's author reports `AuthorConflict`.
    fn add_reviewer(
        &self,
        repository_id: u64,
        proposal_id: u64,
        user_name: &str,
    ) -> Result<ReviewerAddition, Self::Error>;
}

impl<T: ChangeSource + ?Sized> ChangeSource for &T {
    type Error = T::Error;

    fn stream_changes(
        &self,
        proposal: &Proposal,
        on_change: &mut dyn FnMut(&ChangedFile) -> ControlFlow<()>,
    ) -> Result<ChangeSummary, Self::Error> {
        (**self).stream_changes(proposal, on_change)
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for &T {
    type Error = T::Error;

    fn find_by_name_or_email(
        &self,
        name_or_email: &str,
    ) -> Result<Option<UserAccount>, Self::Error> {
        (**self).find_by_name_or_email(name_or_email)
    }
}

impl<T: SecurityService> SecurityService for &T {
    type Error = T::Error;

    fn with_permission<R, F>(
        &self,
        permission: Permission,
        reason: &str,
        op: F,
    ) -> Result<R, Self::Error>
    where
        F: FnOnce() -> R,
    {
        (**self).with_permission(permission, reason, op)
    }
}

impl<T: ReviewerStore + ?Sized> ReviewerStore for &T {
    type Error = T::Error;

    fn add_reviewer(
        &self,
        repository_id: u64,
        proposal_id: u64,
        user_name: &str,
    ) -> Result<ReviewerAddition, Self::Error> {
        (**self).add_reviewer(repository_id, proposal_id, user_name)
    }
}
