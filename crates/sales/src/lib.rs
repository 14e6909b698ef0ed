//! Sales domain module.
//!
//! Sale records ("sold products"), their seller-side status lifecycle, and
//! the reductions behind the seller dashboard. Pure domain logic (no IO, no
//! HTTP, no storage).

pub mod aggregation;
pub mod record;
pub mod scope;

pub use aggregation::{DEFAULT_RANK_SIZE, ProductSales, SalesAggregator, SalesReport};
pub use record::{NewSaleRecord, SaleRecord, SaleStatus, newest_first};
pub use scope::{purchases_of, sales_for_seller};
