//! Local stand-ins for the review host's services.

use std::cell::RefCell;
use std::convert::Infallible;
use std::path::Path;

use ownreview_domain::traits::{ReviewerStore, SecurityService, UserDirectory};
use ownreview_domain::{Permission, ReviewerAddition, UserAccount};
use serde::Deserialize;

use crate::error::Result;

/// Users file layout.
#[derive(Debug, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserEntry>,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    name: String,
    email: Option<String>,
    display_name: Option<String>,
}

/// User directory loaded from a TOML file.
///
/// ```toml
/// [[users]]
/// name = "alice"
/// email = "alice@example.com"
/// display_name = "Alice Liddell"
/// ```
#[derive(Debug, Default)]
pub struct LocalDirectory {
    accounts: Vec<UserAccount>,
}

impl LocalDirectory {
    /// Create a directory from accounts.
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        Self { accounts }
    }

    /// Load a directory from a users file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse a directory from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: UsersFile = toml::from_str(contents)?;
        let accounts = file
            .users
            .into_iter()
            .map(|entry| UserAccount {
                name: entry.name,
                email: entry.email,
                display_name: entry.display_name,
            })
            .collect();
        Ok(Self { accounts })
    }

    /// Number of known accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory has no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl UserDirectory for LocalDirectory {
    type Error = Infallible;

    fn find_by_name_or_email(
        &self,
        name_or_email: &str,
    ) -> std::result::Result<Option<UserAccount>, Infallible> {
        Ok(self
            .accounts
            .iter()
            .find(|account| account.matches(name_or_email))
            .cloned())
    }
}

/// Security service for a single local user: every elevation is granted.
#[derive(Debug, Default)]
pub struct LocalSecurity;

impl SecurityService for LocalSecurity {
    type Error = Infallible;

    fn with_permission<T, F>(
        &self,
        permission: Permission,
        reason: &str,
        op: F,
    ) -> std::result::Result<T, Infallible>
    where
        F: FnOnce() -> T,
    {
        tracing::trace!("Granting {} for {}", permission, reason);
        Ok(op())
    }
}

/// In-memory reviewer list for one proposal.
#[derive(Debug)]
pub struct MemoryReviewers {
    author: String,
    reviewers: RefCell<Vec<String>>,
}

impl MemoryReviewers {
    /// Create an empty reviewer list for a proposal by `author`.
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            reviewers: RefCell::new(Vec::new()),
        }
    }

    /// Reviewers in the order they were added.
    pub fn reviewers(&self) -> Vec<String> {
        self.reviewers.borrow().clone()
    }
}

impl ReviewerStore for MemoryReviewers {
    type Error = Infallible;

    fn add_reviewer(
        &self,
        _repository_id: u64,
        _proposal_id: u64,
        user_name: &str,
    ) -> std::result::Result<ReviewerAddition, Infallible> {
        if user_name == self.author {
            return Ok(ReviewerAddition::AuthorConflict);
        }
        let mut reviewers = self.reviewers.borrow_mut();
        if reviewers.iter().any(|r| r == user_name) {
            return Ok(ReviewerAddition::AlreadyPresent);
        }
        reviewers.push(user_name.to_string());
        Ok(ReviewerAddition::Added)
    }
}
