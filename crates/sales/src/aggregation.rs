//! Seller sales statistics.
//!
//! A pure reduction over the raw sale records: group by product, left-join
//! the product list, rank.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plantstore_core::ProductId;
use plantstore_products::Product;

use crate::{SaleRecord, SaleStatus};

/// Size of the top/bottom performer lists.
pub const DEFAULT_RANK_SIZE: usize = 3;

/// Totals for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub total_sold: u64,
    pub total_revenue: Decimal,
}

/// Output of [`SalesAggregator::aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    /// One row per product, in product input order.
    pub per_product: Vec<ProductSales>,
    /// Best sellers by units, descending.
    pub top: Vec<ProductSales>,
    /// Worst sellers by units, ascending.
    pub bottom: Vec<ProductSales>,
    /// Units over all raw records.
    pub total_units: u64,
    /// Revenue over all raw records.
    pub total_revenue: Decimal,
    /// Number of raw records.
    pub order_count: usize,
    pub units_by_status: BTreeMap<SaleStatus, u64>,
}

impl SalesReport {
    pub fn for_product(&self, product_id: ProductId) -> Option<&ProductSales> {
        self.per_product.iter().find(|row| row.product_id == product_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesAggregator {
    rank_size: usize,
}

impl Default for SalesAggregator {
    fn default() -> Self {
        Self {
            rank_size: DEFAULT_RANK_SIZE,
        }
    }
}

impl SalesAggregator {
    pub fn new(rank_size: usize) -> Self {
        Self { rank_size }
    }

    pub fn rank_size(&self) -> usize {
        self.rank_size
    }

    /// Reduce `sales` into per-product totals joined onto `products`.
    ///
    /// Products without sales appear with zero totals. Records pointing at
    /// products not in the list still count toward the overall totals but
    /// get no per-product row. Rankings are stable by product input order.
    pub fn aggregate(&self, products: &[Product], sales: &[SaleRecord]) -> SalesReport {
        let mut grouped: HashMap<ProductId, (u64, Decimal)> = HashMap::new();
        let mut units_by_status = BTreeMap::new();
        let mut total_units = 0u64;
        let mut total_revenue = Decimal::ZERO;

        for sale in sales {
            let quantity = u64::from(sale.quantity);
            let entry = grouped.entry(sale.product_id).or_insert((0, Decimal::ZERO));
            entry.0 += quantity;
            entry.1 += sale.total_price;

            *units_by_status.entry(sale.status).or_insert(0) += quantity;
            total_units += quantity;
            total_revenue += sale.total_price;
        }

        let per_product: Vec<ProductSales> = products
            .iter()
            .map(|product| {
                let (total_sold, total_revenue) =
                    grouped.get(&product.id).copied().unwrap_or((0, Decimal::ZERO));
                ProductSales {
                    product_id: product.id,
                    name: product.name.clone(),
                    total_sold,
                    total_revenue,
                }
            })
            .collect();

        let mut top = per_product.clone();
        top.sort_by(|a, b| b.total_sold.cmp(&a.total_sold));
        top.truncate(self.rank_size);

        let mut bottom = per_product.clone();
        bottom.sort_by(|a, b| a.total_sold.cmp(&b.total_sold));
        bottom.truncate(self.rank_size);

        SalesReport {
            per_product,
            top,
            bottom,
            total_units,
            total_revenue,
            order_count: sales.len(),
            units_by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewSaleRecord;
    use chrono::{DateTime, Utc};
    use plantstore_core::{SaleRecordId, UserId};
    use plantstore_products::Category;
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn product(id: u64, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: dec!(10),
            category: Category::Plants,
            stock: 10,
            image: String::new(),
            seller_id: UserId::new(1),
            created_at: at(),
            updated_at: at(),
        }
    }

    fn sale(id: u64, product_id: u64, quantity: u32, total: Decimal) -> SaleRecord {
        let mut request = NewSaleRecord::for_line(ProductId::new(product_id), dec!(0), quantity, "addr");
        request.total_price = total;
        request
            .into_record(SaleRecordId::new(id), UserId::new(2), at())
            .unwrap()
    }

    #[test]
    fn sums_quantity_and_revenue_per_product() {
        let products = vec![product(1, "Fern")];
        let sales = vec![sale(1, 1, 3, dec!(30)), sale(2, 1, 2, dec!(20))];

        let report = SalesAggregator::default().aggregate(&products, &sales);
        let fern = report.for_product(ProductId::new(1)).unwrap();
        assert_eq!(fern.total_sold, 5);
        assert_eq!(fern.total_revenue, dec!(50));
        assert_eq!(report.total_units, 5);
        assert_eq!(report.total_revenue, dec!(50));
        assert_eq!(report.order_count, 2);
    }

    #[test]
    fn unsold_products_get_zero_rows() {
        let products = vec![product(1, "Fern"), product(2, "Trowel")];
        let sales = vec![sale(1, 1, 1, dec!(10))];

        let report = SalesAggregator::default().aggregate(&products, &sales);
        let trowel = report.for_product(ProductId::new(2)).unwrap();
        assert_eq!(trowel.total_sold, 0);
        assert_eq!(trowel.total_revenue, Decimal::ZERO);
        assert_eq!(report.per_product.len(), 2);
    }

    #[test]
    fn rankings_are_stable_and_truncated() {
        let products: Vec<Product> = (1..=5).map(|i| product(i, &format!("P{i}"))).collect();
        let sales = vec![
            sale(1, 2, 4, dec!(40)),
            sale(2, 3, 4, dec!(40)),
            sale(3, 5, 9, dec!(90)),
            sale(4, 1, 1, dec!(10)),
        ];

        let report = SalesAggregator::new(3).aggregate(&products, &sales);
        let top: Vec<u64> = report.top.iter().map(|r| r.product_id.get()).collect();
        let bottom: Vec<u64> = report.bottom.iter().map(|r| r.product_id.get()).collect();

        assert_eq!(top, vec![5, 2, 3]);
        assert_eq!(bottom, vec![4, 1, 2]);
    }

    #[test]
    fn orphaned_sales_only_count_toward_totals() {
        let products = vec![product(1, "Fern")];
        let sales = vec![sale(1, 1, 2, dec!(20)), sale(2, 99, 5, dec!(5))];

        let report = SalesAggregator::default().aggregate(&products, &sales);
        assert_eq!(report.per_product.len(), 1);
        assert_eq!(report.total_units, 7);
        assert_eq!(report.for_product(ProductId::new(1)).unwrap().total_sold, 2);
    }

    #[test]
    fn units_are_split_by_status() {
        let products = vec![product(1, "Fern")];
        let mut cancelled = sale(2, 1, 2, dec!(20));
        cancelled.status = SaleStatus::Cancelled;
        let sales = vec![sale(1, 1, 3, dec!(30)), cancelled];

        let report = SalesAggregator::default().aggregate(&products, &sales);
        assert_eq!(report.units_by_status.get(&SaleStatus::Pending), Some(&3));
        assert_eq!(report.units_by_status.get(&SaleStatus::Cancelled), Some(&2));
        assert_eq!(report.units_by_status.get(&SaleStatus::Shipped), None);
    }

    #[test]
    fn empty_inputs_give_empty_report() {
        let report = SalesAggregator::default().aggregate(&[], &[]);
        assert_eq!(report, SalesReport::default());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: per-product units add up to the raw units when every
            /// sale references a listed product.
            #[test]
            fn per_product_units_sum_to_raw_units(
                product_count in 1u64..8,
                rows in prop::collection::vec((0u64..8, 1u32..50, 0i64..10_000), 0..60),
            ) {
                let products: Vec<Product> =
                    (1..=product_count).map(|i| product(i, "p")).collect();
                let sales: Vec<SaleRecord> = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, (pid, qty, cents))| {
                        sale(i as u64 + 1, pid % product_count + 1, qty, Decimal::new(cents, 2))
                    })
                    .collect();

                let report = SalesAggregator::default().aggregate(&products, &sales);
                let raw_units: u64 = sales.iter().map(|s| u64::from(s.quantity)).sum();
                let joined_units: u64 = report.per_product.iter().map(|r| r.total_sold).sum();
                let joined_revenue: Decimal = report.per_product.iter().map(|r| r.total_revenue).sum();

                prop_assert_eq!(joined_units, raw_units);
                prop_assert_eq!(report.total_units, raw_units);
                prop_assert_eq!(joined_revenue, report.total_revenue);
            }

            /// Property: rankings are ordered and drawn from the joined rows.
            #[test]
            fn rankings_are_ordered(
                rows in prop::collection::vec((1u64..6, 1u32..20), 0..30),
                rank_size in 0usize..6,
            ) {
                let products: Vec<Product> = (1..=5).map(|i| product(i, "p")).collect();
                let sales: Vec<SaleRecord> = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, (pid, qty))| sale(i as u64 + 1, pid, qty, Decimal::ONE))
                    .collect();

                let report = SalesAggregator::new(rank_size).aggregate(&products, &sales);
                prop_assert_eq!(report.top.len(), rank_size.min(5));
                prop_assert_eq!(report.bottom.len(), rank_size.min(5));
                prop_assert!(report.top.windows(2).all(|w| w[0].total_sold >= w[1].total_sold));
                prop_assert!(report.bottom.windows(2).all(|w| w[0].total_sold <= w[1].total_sold));
            }
        }
    }
}
