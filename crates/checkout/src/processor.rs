//! Checkout: one sale record per cart line.
//!
//! ```text
//! Idle ──► Validating ──► Submitting ──► Success
//!              │               │
//!              └───────────────┴──────► Failed
//! ```
//!
//! - Validating: the session must be logged in, the cart non-empty and a
//!   shipping address resolvable. Failing here sends nothing to the store.
//! - Submitting: every line is sent at once and the calls are joined. The
//!   attempt succeeds only if every line does. There is no rollback: lines
//!   the store accepted stay recorded when another line fails.
//!
//! Retries are safe because each line carries an idempotency key that is
//! reused until checkout succeeds, so a line the store already accepted
//! comes back as the existing record instead of a second sale. A key only
//! covers the exact request it was minted for: changing the quantity, the
//! price or the shipping address gives the line a fresh key.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;

use plantstore_auth::{AuthSession, require_authenticated};
use plantstore_cart::{CartLedger, CartLine, CartStorage};
use plantstore_client::StoreGateway;
use plantstore_core::{IdempotencyKey, ProductId};
use plantstore_sales::{NewSaleRecord, SaleRecord};

use crate::{CheckoutError, DEFAULT_NOTICE_SECS, ShippingDetails, SuccessNotice};

const SUCCESS_MESSAGE: &str = "Your order has been placed!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

/// Drives checkout for one session.
#[derive(Debug)]
pub struct CheckoutProcessor<G> {
    gateway: G,
    state: CheckoutState,
    confirming: bool,
    notice: Option<SuccessNotice>,
    notice_ttl: TimeDelta,
    last_error: Option<CheckoutError>,
    /// Key per product, valid while the line's request terms are unchanged.
    line_keys: HashMap<ProductId, (LineTerms, IdempotencyKey)>,
}

/// What a line's idempotency key was minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineTerms {
    quantity: u32,
    unit_price: Decimal,
    address: String,
}

impl LineTerms {
    fn of(line: &CartLine, address: &str) -> Self {
        Self {
            quantity: line.quantity,
            unit_price: line.product.price,
            address: address.to_string(),
        }
    }
}

impl<G: StoreGateway> CheckoutProcessor<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: CheckoutState::Idle,
            confirming: false,
            notice: None,
            notice_ttl: TimeDelta::seconds(DEFAULT_NOTICE_SECS),
            last_error: None,
            line_keys: HashMap::new(),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: TimeDelta) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn last_error(&self) -> Option<&CheckoutError> {
        self.last_error.as_ref()
    }

    /// Whether the order confirmation prompt is open.
    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn open_confirmation(&mut self) {
        self.confirming = true;
    }

    pub fn close_confirmation(&mut self) {
        self.confirming = false;
    }

    /// The success notice, while it has not expired.
    pub fn notice_at(&self, now: DateTime<Utc>) -> Option<&SuccessNotice> {
        self.notice.as_ref().filter(|n| n.is_visible_at(now))
    }

    /// Place the order for everything in `cart`.
    ///
    /// On success the cart is emptied and the created records are returned
    /// in cart-line order. On failure the cart is left as it was and the
    /// error of the first failing line is returned.
    pub async fn checkout<S: CartStorage>(
        &mut self,
        session: &AuthSession,
        cart: &mut CartLedger<S>,
        shipping: &ShippingDetails,
        now: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>, CheckoutError> {
        self.state = CheckoutState::Validating;
        self.last_error = None;

        let buyer = match require_authenticated(session) {
            Ok(user) => user,
            Err(err) => return Err(self.fail(err.into())),
        };
        if cart.is_empty() {
            return Err(self.fail(CheckoutError::validation("Your cart is empty.")));
        }
        let address = match shipping.resolve(buyer) {
            Ok(address) => address.to_string(),
            Err(err) => return Err(self.fail(err)),
        };

        let lines = cart.lines().to_vec();
        self.forget_stale_keys(&lines);
        let requests: Vec<NewSaleRecord> = lines
            .iter()
            .map(|line| {
                NewSaleRecord::for_line(line.product_id(), line.product.price, line.quantity, &*address)
                    .with_idempotency_key(self.key_for(line, &address))
            })
            .collect();

        self.state = CheckoutState::Submitting;
        tracing::info!(buyer_id = %buyer.id, lines = requests.len(), "submitting checkout");

        let results = join_all(
            requests
                .into_iter()
                .map(|request| self.gateway.create_sale_record(buyer, request)),
        )
        .await;

        let mut records = Vec::with_capacity(results.len());
        let mut first_error = None;
        for (line, result) in lines.iter().zip(results) {
            match result {
                Ok(record) => records.push(record),
                Err(source) => {
                    tracing::warn!(
                        buyer_id = %buyer.id,
                        product_id = %line.product_id(),
                        error = %source,
                        "sale record creation failed"
                    );
                    first_error.get_or_insert(CheckoutError::Remote {
                        product_id: line.product_id(),
                        source,
                    });
                }
            }
        }
        if let Some(err) = first_error {
            return Err(self.fail(err));
        }

        let total: Decimal = records.iter().map(|r| r.total_price).sum();
        cart.clear();
        self.line_keys.clear();
        self.confirming = false;
        self.notice = Some(SuccessNotice::new(SUCCESS_MESSAGE, now, self.notice_ttl));
        self.state = CheckoutState::Success;

        tracing::info!(buyer_id = %buyer.id, records = records.len(), %total, "checkout complete");
        Ok(records)
    }

    fn key_for(&mut self, line: &CartLine, address: &str) -> IdempotencyKey {
        let terms = LineTerms::of(line, address);
        match self.line_keys.get_mut(&line.product_id()) {
            Some((known, key)) if *known == terms => *key,
            Some(entry) => {
                *entry = (terms, IdempotencyKey::new());
                entry.1
            }
            None => {
                let key = IdempotencyKey::new();
                self.line_keys.insert(line.product_id(), (terms, key));
                key
            }
        }
    }

    fn forget_stale_keys(&mut self, lines: &[CartLine]) {
        self.line_keys
            .retain(|id, _| lines.iter().any(|line| line.product_id() == *id));
    }

    fn fail(&mut self, err: CheckoutError) -> CheckoutError {
        tracing::debug!(error = %err, "checkout failed");
        self.state = CheckoutState::Failed;
        self.last_error = Some(err.clone());
        err
    }
}
