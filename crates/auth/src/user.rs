//! User records as delivered by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plantstore_core::{DomainError, DomainResult, Entity, UserId};

use crate::Role;

/// Longest phone number the store accepts.
pub const MAX_PHONE_LEN: usize = 15;

/// A registered account (buyer or seller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Default shipping address; may be blank.
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with empty contact fields.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let user = Self {
            id,
            username: username.into(),
            role,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            address: String::new(),
            created_at,
        };
        user.validate()?;
        Ok(user)
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_contact(
        mut self,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> DomainResult<Self> {
        self.email = email.into();
        self.phone_number = phone_number.into();
        self.validate()?;
        Ok(self)
    }

    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }

    /// The address on file, if it is not blank.
    pub fn shipping_address(&self) -> Option<&str> {
        let trimmed = self.address.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if self.phone_number.chars().count() > MAX_PHONE_LEN {
            return Err(DomainError::validation(format!(
                "phone number cannot be longer than {MAX_PHONE_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}
