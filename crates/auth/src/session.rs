//! Session-derived identity.

use crate::User;

/// Who is acting in the current session.
///
/// One instance per user session. Anonymous sessions are valid: browsing the
/// storefront and filling a cart do not need an account, checkout does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    user: Option<User>,
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: User) -> Self {
        tracing::debug!(user_id = %user.id, role = %user.role, "session authenticated");
        Self { user: Some(user) }
    }

    /// `currentUser()`: the logged-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, user: User) {
        *self = Self::authenticated(user);
    }

    /// Drop the identity; returns the user that was logged in.
    pub fn logout(&mut self) -> Option<User> {
        let previous = self.user.take();
        if let Some(user) = &previous {
            tracing::debug!(user_id = %user.id, "session logged out");
        }
        previous
    }
}
