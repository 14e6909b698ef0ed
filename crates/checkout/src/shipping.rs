use plantstore_auth::User;

use crate::CheckoutError;

/// Where the buyer wants the order sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    /// Ship to the address on the buyer's account instead of `address`.
    pub use_account_address: bool,
    pub address: String,
}

impl ShippingDetails {
    pub fn to(address: impl Into<String>) -> Self {
        Self {
            use_account_address: false,
            address: address.into(),
        }
    }

    pub fn account_address() -> Self {
        Self {
            use_account_address: true,
            address: String::new(),
        }
    }

    /// The address to put on every sale record, trimmed.
    pub fn resolve<'a>(&'a self, buyer: &'a User) -> Result<&'a str, CheckoutError> {
        if self.use_account_address {
            return buyer.shipping_address().ok_or_else(|| {
                CheckoutError::validation(
                    "Your account has no address on file. Please enter a shipping address.",
                )
            });
        }
        match self.address.trim() {
            "" => Err(CheckoutError::validation("Please enter a shipping address.")),
            address => Ok(address),
        }
    }
}
