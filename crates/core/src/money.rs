//! Money arithmetic.
//!
//! Prices are `Decimal` with two places, matching the store's
//! `DECIMAL(10, 2)` columns.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to cents (midpoint away from zero).
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `round(unit_price * quantity, 2)`, the total charged for one line.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    round_money(unit_price * Decimal::from(quantity))
}
