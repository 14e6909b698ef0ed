use serde::{Deserialize, Serialize};

/// Account role. The store has exactly two: people who list products and
/// people who buy them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Buyer,
    Seller,
}

impl Role {
    /// Map the store's `is_seller` flag onto a role.
    pub fn from_seller_flag(is_seller: bool) -> Self {
        if is_seller { Role::Seller } else { Role::Buyer }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
