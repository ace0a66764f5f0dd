//! Identity provider: resolves the user a dashboard session belongs to.
//!
//! Every store read, mutation, and subscription is scoped to the resolved
//! user id; there is no cross-user surface anywhere above this seam.

use std::env;

use crate::types::errors::AuthError;
use crate::types::user::AuthenticatedUser;

/// Trait defining the identity provider interface.
pub trait IdentityProvider: Send + Sync {
    /// Resolves the currently authenticated user, or
    /// `AuthError::Unauthenticated` if there is none.
    fn current_user(&self) -> Result<AuthenticatedUser, AuthError>;
}

/// Identity provider with one fixed user. Used by the demo binary and tests.
pub struct StaticIdentity {
    user: AuthenticatedUser,
}

impl StaticIdentity {
    pub fn new(id: &str, email: &str) -> Self {
        Self {
            user: AuthenticatedUser {
                id: id.to_string(),
                email: email.to_string(),
            },
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Result<AuthenticatedUser, AuthError> {
        Ok(self.user.clone())
    }
}

/// Identity provider backed by process environment variables.
///
/// Reads `SMARTMARKS_USER_ID` and `SMARTMARKS_USER_EMAIL`. A missing or
/// blank user id means the process is unauthenticated.
pub struct EnvIdentity;

impl IdentityProvider for EnvIdentity {
    fn current_user(&self) -> Result<AuthenticatedUser, AuthError> {
        let id = env::var("SMARTMARKS_USER_ID").map_err(|_| AuthError::Unauthenticated)?;
        if id.trim().is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        let email = env::var("SMARTMARKS_USER_EMAIL").unwrap_or_else(|_| "unknown".to_string());
        Ok(AuthenticatedUser { id, email })
    }
}
