//! `plantstore-cart`: the shopping cart ledger.
//!
//! A [`CartLedger`] is owned by exactly one user session. It keeps at most
//! one line per product and writes itself through to a [`CartStorage`] on
//! every change so the cart survives a restart.

pub mod ledger;
pub mod line;
pub mod storage;

pub use ledger::CartLedger;
pub use line::{CartLine, ProductSnapshot};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
