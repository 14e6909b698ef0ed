//! `plantstore-auth`: user identity, sessions and authorization guards.
//!
//! This crate is intentionally decoupled from HTTP and storage: how a session
//! is established (cookies, CSRF tokens) is the transport's business. Domain
//! code only sees an [`AuthSession`] and asks it who is acting.

pub mod authorize;
pub mod roles;
pub mod session;
pub mod user;

pub use authorize::{AuthzError, require_authenticated, require_owner, require_seller};
pub use roles::Role;
pub use session::AuthSession;
pub use user::User;
