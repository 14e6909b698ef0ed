//! `plantstore-app`: per-session wiring of the store's domain crates.
//!
//! - [`StoreConfig`]: runtime settings from the environment
//! - [`StoreSession`]: one visitor's identity, cart and checkout
//! - [`Storefront`]: catalog browsing with paging
//! - [`SellerDashboard`]: seller product management and sales report

pub mod config;
pub mod dashboard;
pub mod session;
pub mod storefront;

pub use config::StoreConfig;
pub use dashboard::{DashboardError, DashboardView, SellerDashboard};
pub use session::{StoreSession, cart_key};
pub use storefront::{Storefront, StorefrontPage};
