//! Reviewer additions reported by the host

/// Outcome of asking the host to add a reviewer to a proposal
///
/// Storage failures are reported through the store's error type instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewerAddition {
    /// The account is now a reviewer
    Added,

    /// The account already was a reviewer; nothing changed
    AlreadyPresent,

    /// The account is the proposal's author and cannot take the reviewer role
    AuthorConflict,
}

impl ReviewerAddition {
    /// Get the outcome name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewerAddition::Added => "added",
            ReviewerAddition::AlreadyPresent => "already_present",
            ReviewerAddition::AuthorConflict => "author_conflict",
        }
    }
}
