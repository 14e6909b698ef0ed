//! `plantstore-checkout`: turning a cart into sale records.
//!
//! [`CheckoutProcessor`] validates the session, cart and shipping details,
//! then fans one sale-record request per cart line out to the
//! [`plantstore_client::StoreGateway`] and joins the results.

pub mod error;
pub mod notice;
pub mod processor;
pub mod shipping;

pub use error::{CheckoutError, GENERIC_FAILURE_MESSAGE};
pub use notice::{DEFAULT_NOTICE_SECS, SuccessNotice};
pub use processor::{CheckoutProcessor, CheckoutState};
pub use shipping::ShippingDetails;
