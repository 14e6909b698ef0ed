//! Products domain module.
//!
//! Product listing rules (validation, stock reservation) and the storefront's
//! catalog derivation (visibility, filter, search, sort, pagination),
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod catalog;
pub mod pagination;
pub mod product;

pub use catalog::{CatalogQuery, CategoryFilter, ProductCatalog, SortKey};
pub use pagination::{DEFAULT_PAGE_SIZE, Paginator};
pub use product::{Category, NewProduct, Product, ProductUpdate};
