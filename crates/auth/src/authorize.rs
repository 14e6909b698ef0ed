use thiserror::Error;

use plantstore_core::{DomainError, UserId};

use crate::{AuthSession, User};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("please log in to continue")]
    AuthenticationRequired,

    #[error("only sellers can {0}")]
    SellerOnly(&'static str),

    #[error("this listing belongs to another seller")]
    NotOwner,
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        DomainError::forbidden(err.to_string())
    }
}

/// Require a logged-in user.
///
/// - No IO
/// - No panics
pub fn require_authenticated(session: &AuthSession) -> Result<&User, AuthzError> {
    session.current_user().ok_or(AuthzError::AuthenticationRequired)
}

/// Require a logged-in seller. `action` completes "only sellers can ...".
pub fn require_seller<'a>(
    session: &'a AuthSession,
    action: &'static str,
) -> Result<&'a User, AuthzError> {
    let user = require_authenticated(session)?;
    if user.is_seller() {
        Ok(user)
    } else {
        Err(AuthzError::SellerOnly(action))
    }
}

/// Require that `user` is the seller owning a record.
pub fn require_owner(user: &User, owner: UserId) -> Result<(), AuthzError> {
    if user.is_seller() && user.id == owner {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}
