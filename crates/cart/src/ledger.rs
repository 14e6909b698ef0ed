use std::collections::HashSet;

use rust_decimal::Decimal;

use plantstore_core::ProductId;

use crate::{CartLine, CartStorage, ProductSnapshot};

/// Quantity-keyed cart with write-through persistence.
///
/// Invariants: at most one line per product id; every quantity is ≥ 1.
///
/// Persistence never fails an operation. A cart that cannot be loaded starts
/// empty; a save that fails is logged and the in-memory state is kept.
#[derive(Debug)]
pub struct CartLedger<S: CartStorage> {
    storage: S,
    key: String,
    lines: Vec<CartLine>,
}

impl<S: CartStorage> CartLedger<S> {
    /// Reload the cart stored under `key`, or start empty.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let lines = match storage.load(&key) {
            Ok(Some(raw)) => decode(&key, &raw),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(cart_key = %key, error = %err, "failed to load cart; starting empty");
                Vec::new()
            }
        };
        tracing::debug!(cart_key = %key, lines = lines.len(), "cart loaded");
        Self { storage, key, lines }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` units; merges into an existing line for the same
    /// product. Zero is ignored, as is an add that would overflow the line.
    pub fn add(&mut self, product: impl Into<ProductSnapshot>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let product = product.into();
        match self.lines.iter_mut().find(|l| l.product_id() == product.id) {
            Some(line) => match line.quantity.checked_add(quantity) {
                Some(merged) => line.quantity = merged,
                None => {
                    tracing::warn!(
                        cart_key = %self.key,
                        product_id = %product.id,
                        current = line.quantity,
                        quantity,
                        "cart line quantity would overflow; add ignored"
                    );
                    return;
                }
            },
            None => self.lines.push(CartLine { product, quantity }),
        }
        self.persist();
    }

    /// Delete the line for `product_id`; no-op if absent.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartLine> {
        let idx = self.lines.iter().position(|l| l.product_id() == product_id)?;
        let removed = self.lines.remove(idx);
        self.persist();
        Some(removed)
    }

    /// Overwrite a line's quantity.
    ///
    /// Quantities below 1 are rejected (the line is left untouched, not
    /// removed); use [`CartLedger::remove`] to drop a line. Returns whether
    /// the quantity was applied.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id() == product_id) else {
            return false;
        };
        line.quantity = quantity;
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities over all lines.
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.lines) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(cart_key = %self.key, error = %err, "failed to encode cart");
                return;
            }
        };
        if let Err(err) = self.storage.save(&self.key, &encoded) {
            tracing::warn!(cart_key = %self.key, error = %err, "failed to persist cart");
        }
    }
}

fn decode(key: &str, raw: &str) -> Vec<CartLine> {
    let lines: Vec<CartLine> = match serde_json::from_str(raw) {
        Ok(lines) => lines,
        Err(err) => {
            tracing::warn!(cart_key = %key, error = %err, "stored cart is unreadable; starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let valid = lines
        .iter()
        .all(|l| l.quantity >= 1 && seen.insert(l.product_id()));
    if !valid {
        tracing::warn!(cart_key = %key, "stored cart breaks line invariants; starting empty");
        return Vec::new();
    }
    lines
}
