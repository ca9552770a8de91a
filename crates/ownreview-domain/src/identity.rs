//! Owner declarations, user accounts and permissions

use std::fmt;

/// A raw owner token (user name or email) read from attribute metadata
///
/// Not validated: the token may not match any account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerDeclaration(String);

impl OwnerDeclaration {
    /// Wrap a single token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Split an attribute value into owner declarations
    ///
    /// Tokens are separated by any run of ASCII whitespace or commas (a
    /// `.gitattributes` value cannot itself contain whitespace); order is kept
    /// and repeats are not removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ownreview_domain::OwnerDeclaration;
    ///
    /// let owners = OwnerDeclaration::parse_list("alice  bob@example.com\t");
    /// assert_eq!(owners.len(), 2);
    /// assert_eq!(owners[1].as_str(), "bob@example.com");
    /// ```
    pub fn parse_list(value: &str) -> Vec<Self> {
        value
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| Self(token.to_string()))
            .collect()
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token looks like an email address
    pub fn is_email(&self) -> bool {
        self.0.contains('@')
    }
}

impl fmt::Display for OwnerDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user account known to the host's directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Unique account name; reviewers are added by this name
    pub name: String,

    /// Primary email address
    pub email: Option<String>,

    /// Display name
    pub display_name: Option<String>,
}

impl UserAccount {
    /// Create an account with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            display_name: None,
        }
    }

    /// Attach an email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Whether this account matches a token by exact name or case-insensitive email
    pub fn matches(&self, token: &str) -> bool {
        self.name == token
            || self
                .email
                .as_deref()
                .is_some_and(|email| email.eq_ignore_ascii_case(token))
    }
}

/// Permission levels a call can be elevated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read access to the repository
    RepoRead,

    /// Write access to the repository
    RepoWrite,

    /// Administrative access to the repository
    RepoAdmin,

    /// Administrative access to the owning project
    ProjectAdmin,

    /// Global administrator
    Admin,
}

impl Permission {
    /// Get the permission name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::RepoRead => "repo_read",
            Permission::RepoWrite => "repo_write",
            Permission::RepoAdmin => "repo_admin",
            Permission::ProjectAdmin => "project_admin",
            Permission::Admin => "admin",
        }
    }

    /// Parse a permission from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "repo_read" => Some(Permission::RepoRead),
            "repo_write" => Some(Permission::RepoWrite),
            "repo_admin" => Some(Permission::RepoAdmin),
            "project_admin" => Some(Permission::ProjectAdmin),
            "admin" => Some(Permission::Admin),
            _ => None,
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid permission: {}", s))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
