use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plantstore_core::{
    DomainError, DomainResult, Entity, IdempotencyKey, ProductId, SaleRecordId, UserId, line_total,
};

/// Order status. The owning seller may set any status, in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SaleStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 5] = [
        SaleStatus::Pending,
        SaleStatus::Processing,
        SaleStatus::Shipped,
        SaleStatus::Delivered,
        SaleStatus::Cancelled,
    ];
}

impl core::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// A purchased quantity of one product. Immutable after creation except for
/// seller-side status transitions; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleRecordId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub quantity: u32,
    /// `round(unit_price * quantity, 2)` at the time of sale.
    pub total_price: Decimal,
    pub status: SaleStatus,
    pub shipping_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<IdempotencyKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Set the status to `next`. Only a repeat of the current status fails.
    pub fn transition(&mut self, next: SaleStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == next {
            return Err(DomainError::conflict(format!("sale {} is already {next}", self.id)));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for SaleRecord {
    type Id = SaleRecordId;

    fn id(&self) -> SaleRecordId {
        self.id
    }
}

/// Request to create a sale record (`createSaleRecord`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSaleRecord {
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: SaleStatus,
    pub shipping_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<IdempotencyKey>,
}

impl NewSaleRecord {
    /// Request for one cart line: total is `round(price * quantity, 2)`,
    /// status is `Pending`.
    pub fn for_line(
        product_id: ProductId,
        unit_price: Decimal,
        quantity: u32,
        shipping_address: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            quantity,
            total_price: line_total(unit_price, quantity),
            status: SaleStatus::Pending,
            shipping_address: shipping_address.into(),
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: IdempotencyKey) -> Self {
        self.idempotency_key = Some(key);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if self.total_price.is_sign_negative() && !self.total_price.is_zero() {
            return Err(DomainError::validation("total price cannot be negative"));
        }
        if self.status != SaleStatus::Pending {
            return Err(DomainError::validation("new sales must start as Pending"));
        }
        if self.shipping_address.trim().is_empty() {
            return Err(DomainError::validation("shipping address is required"));
        }
        Ok(())
    }

    pub fn into_record(
        self,
        id: SaleRecordId,
        buyer_id: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<SaleRecord> {
        self.validate()?;
        Ok(SaleRecord {
            id,
            product_id: self.product_id,
            buyer_id,
            quantity: self.quantity,
            total_price: self.total_price,
            status: self.status,
            shipping_address: self.shipping_address,
            idempotency_key: self.idempotency_key,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Sort records the way the store lists them: newest first, ties by id
/// descending.
pub fn newest_first(records: &mut [SaleRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn record() -> SaleRecord {
        NewSaleRecord::for_line(ProductId::new(1), dec!(10), 2, "1 Leaf Rd")
            .into_record(SaleRecordId::new(1), UserId::new(2), at(0))
            .unwrap()
    }

    #[test]
    fn line_request_prices_and_starts_pending() {
        let req = NewSaleRecord::for_line(ProductId::new(1), dec!(3.335), 3, "1 Leaf Rd");
        assert_eq!(req.total_price, dec!(10.01));
        assert_eq!(req.status, SaleStatus::Pending);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_validation() {
        let mut req = NewSaleRecord::for_line(ProductId::new(1), dec!(1), 1, "  ");
        assert!(req.validate().is_err());

        req.shipping_address = "1 Leaf Rd".to_string();
        req.quantity = 0;
        assert!(req.validate().is_err());

        req.quantity = 1;
        req.status = SaleStatus::Shipped;
        assert!(req.validate().is_err());
    }

    #[test]
    fn usual_fulfilment_path() {
        let mut sale = record();
        sale.transition(SaleStatus::Processing, at(1)).unwrap();
        sale.transition(SaleStatus::Shipped, at(2)).unwrap();
        sale.transition(SaleStatus::Delivered, at(3)).unwrap();
        assert_eq!(sale.status, SaleStatus::Delivered);
        assert_eq!(sale.updated_at, at(3));
    }

    #[test]
    fn seller_can_correct_or_cancel_a_shipped_sale() {
        let mut sale = record();
        sale.transition(SaleStatus::Processing, at(1)).unwrap();
        sale.transition(SaleStatus::Shipped, at(2)).unwrap();

        sale.transition(SaleStatus::Processing, at(3)).unwrap();
        assert_eq!(sale.status, SaleStatus::Processing);

        sale.transition(SaleStatus::Shipped, at(4)).unwrap();
        sale.transition(SaleStatus::Cancelled, at(5)).unwrap();
        assert_eq!(sale.status, SaleStatus::Cancelled);
        assert_eq!(sale.updated_at, at(5));
    }

    #[test]
    fn every_other_status_is_reachable() {
        for from in SaleStatus::ALL {
            for to in SaleStatus::ALL.into_iter().filter(|to| *to != from) {
                let mut sale = record();
                sale.status = from;
                assert!(sale.transition(to, at(1)).is_ok(), "{from} -> {to}");
                assert_eq!(sale.status, to);
            }
        }
    }

    #[test]
    fn repeating_a_status_is_a_conflict() {
        let mut sale = record();
        let err = sale.transition(SaleStatus::Pending, at(1)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(sale.updated_at, at(0));
    }

    #[test]
    fn newest_first_orders_by_creation() {
        let mut a = record();
        let mut b = record();
        b.id = SaleRecordId::new(2);
        b.created_at = at(10);
        a.created_at = at(5);
        let mut list = vec![a, b];
        newest_first(&mut list);
        assert_eq!(list[0].id, SaleRecordId::new(2));
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_string(&SaleStatus::Processing).unwrap(), "\"Processing\"");
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("idempotency_key").is_none());
    }
}
