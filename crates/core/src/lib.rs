//! `plantstore-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error model and money helpers.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::{Entity, find_by_id, find_by_id_mut};
pub use error::{DomainError, DomainResult};
pub use id::{IdempotencyKey, ProductId, SaleRecordId, UserId};
pub use money::{line_total, round_money};
