use thiserror::Error;

use plantstore_auth::AuthzError;
use plantstore_client::RemoteError;
use plantstore_core::ProductId;

/// Shown when the store rejects a line without saying why.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while placing your order. Please try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Bad or missing input; nothing was sent to the store.
    #[error("{0}")]
    Validation(String),

    #[error("please log in to complete your purchase")]
    AuthenticationRequired,

    /// The store failed the sale record for one cart line.
    #[error("sale record for product {product_id} failed: {source}")]
    Remote {
        product_id: ProductId,
        #[source]
        source: RemoteError,
    },
}

impl CheckoutError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Inline message for the buyer.
    ///
    /// Store failures stay generic unless the store named the offending
    /// field, in which case its reason is shown as given.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Validation(msg) => msg.clone(),
            CheckoutError::AuthenticationRequired => {
                "Please log in to complete your purchase.".to_string()
            }
            CheckoutError::Remote { source, .. } => match source.field_reason() {
                Some((_, reason)) => reason.to_string(),
                None => GENERIC_FAILURE_MESSAGE.to_string(),
            },
        }
    }
}

impl From<AuthzError> for CheckoutError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::AuthenticationRequired => CheckoutError::AuthenticationRequired,
            other => CheckoutError::Validation(other.to_string()),
        }
    }
}
