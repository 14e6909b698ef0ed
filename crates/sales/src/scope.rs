//! Who gets to see which sale records.
//!
//! Sellers see sales of their own products; buyers see their own purchases.

use std::collections::HashSet;

use plantstore_core::{ProductId, UserId};
use plantstore_products::Product;

use crate::SaleRecord;

/// Sale records for products listed by `seller_id`.
///
/// Ownership comes from `products`; records for unknown products are
/// excluded.
pub fn sales_for_seller<'a>(
    seller_id: UserId,
    products: &[Product],
    sales: &'a [SaleRecord],
) -> Vec<&'a SaleRecord> {
    let owned: HashSet<ProductId> = products
        .iter()
        .filter(|p| p.seller_id == seller_id)
        .map(|p| p.id)
        .collect();

    sales
        .iter()
        .filter(|s| owned.contains(&s.product_id))
        .collect()
}

/// Purchase history of `buyer_id`.
pub fn purchases_of(buyer_id: UserId, sales: &[SaleRecord]) -> Vec<&SaleRecord> {
    sales.iter().filter(|s| s.buyer_id == buyer_id).collect()
}
