//! Owner token to user account resolution

use std::fmt::Display;

use ownreview_domain::traits::{SecurityService, UserDirectory};
use ownreview_domain::{OwnerDeclaration, Permission, UserAccount};

use crate::ResolveError;

/// Resolves owner declarations against the host's user directory
///
/// Each lookup is wrapped in its own elevation to `permission`; the elevated
/// scope never spans more than one lookup.
pub struct IdentityResolver<U, S> {
    users: U,
    security: S,
    permission: Permission,
    reason: String,
}

impl<U, S> IdentityResolver<U, S>
where
    U: UserDirectory,
    U::Error: Display,
    S: SecurityService,
    S::Error: Display,
{
    /// Create a resolver elevating to `permission` for every lookup
    pub fn new(users: U, security: S, permission: Permission, reason: impl Into<String>) -> Self {
        Self {
            users,
            security,
            permission,
            reason: reason.into(),
        }
    }

    /// Look up the account for `owner`, reporting why it failed
    pub fn lookup(&self, owner: &OwnerDeclaration) -> Result<UserAccount, ResolveError> {
        let token = owner.as_str();
        let found = self
            .security
            .with_permission(self.permission, &self.reason, || {
                self.users.find_by_name_or_email(token)
            });

        match found {
            Ok(Ok(Some(account))) => Ok(account),
            Ok(Ok(None)) => Err(ResolveError::NotFound(token.to_string())),
            Ok(Err(e)) => Err(ResolveError::Lookup {
                token: token.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => Err(ResolveError::Lookup {
                token: token.to_string(),
                reason: format!("elevation to {} refused: {}", self.permission, e),
            }),
        }
    }

    /// Resolve `owner`, logging and swallowing every failure
    ///
    /// Unknown tokens are logged as warnings, lookup failures as errors.
    pub fn resolve(&self, owner: &OwnerDeclaration) -> Option<UserAccount> {
        match self.lookup(owner) {
            Ok(account) => {
                tracing::debug!("Resolved owner {} to account {}", owner, account.name);
                Some(account)
            }
            Err(e @ ResolveError::NotFound(_)) => {
                tracing::warn!("{}", e);
                None
            }
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }
}
