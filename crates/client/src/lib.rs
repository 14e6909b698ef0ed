//! `plantstore-client`: the contract with the store's API.
//!
//! [`StoreGateway`] is everything the domain layer consumes from the server:
//! product and sale-record listing, sale-record creation, and the seller-side
//! product/order management calls. Transport (HTTP, session cookies, CSRF
//! tokens) lives behind implementations of this trait.
//!
//! [`InMemoryStore`] reproduces the server's observable behavior for tests
//! and the demo binary.

pub mod error;
pub mod gateway;
pub mod in_memory;

pub use error::RemoteError;
pub use gateway::StoreGateway;
pub use in_memory::InMemoryStore;
