use chrono::{DateTime, Utc};

use plantstore_auth::{AuthSession, User};
use plantstore_cart::{CartLedger, CartStorage};
use plantstore_checkout::{CheckoutError, CheckoutProcessor, ShippingDetails};
use plantstore_client::StoreGateway;
use plantstore_sales::SaleRecord;

use crate::StoreConfig;

/// Storage key of the cart belonging to `user`; anonymous visitors share
/// the plain `cart` key.
pub fn cart_key(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("cart-user-{}", user.id),
        None => "cart".to_string(),
    }
}

/// Everything one visitor's session owns: identity, cart and checkout.
///
/// Built at login (or for an anonymous visit) and consumed by
/// [`StoreSession::logout`].
#[derive(Debug)]
pub struct StoreSession<G, S: CartStorage> {
    auth: AuthSession,
    cart: CartLedger<S>,
    checkout: CheckoutProcessor<G>,
}

impl<G: StoreGateway, S: CartStorage> StoreSession<G, S> {
    pub fn anonymous(gateway: G, storage: S, config: &StoreConfig) -> Self {
        Self::open(AuthSession::anonymous(), gateway, storage, config)
    }

    pub fn login(user: User, gateway: G, storage: S, config: &StoreConfig) -> Self {
        Self::open(AuthSession::authenticated(user), gateway, storage, config)
    }

    fn open(auth: AuthSession, gateway: G, storage: S, config: &StoreConfig) -> Self {
        let cart = CartLedger::load(storage, cart_key(auth.current_user()));
        let checkout = CheckoutProcessor::new(gateway).with_notice_ttl(config.notice_ttl());
        tracing::info!(
            user_id = auth.current_user().map(|u| u.id.get()),
            cart_key = cart.key(),
            "session opened"
        );
        Self { auth, cart, checkout }
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn current_user(&self) -> Option<&User> {
        self.auth.current_user()
    }

    pub fn cart(&self) -> &CartLedger<S> {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartLedger<S> {
        &mut self.cart
    }

    pub fn checkout_processor(&self) -> &CheckoutProcessor<G> {
        &self.checkout
    }

    pub fn open_confirmation(&mut self) {
        self.checkout.open_confirmation();
    }

    pub async fn checkout(
        &mut self,
        shipping: &ShippingDetails,
        now: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>, CheckoutError> {
        self.checkout
            .checkout(&self.auth, &mut self.cart, shipping, now)
            .await
    }

    /// End the session. The cart stays saved under the user's key.
    pub fn logout(self) -> Option<User> {
        let Self { mut auth, cart, .. } = self;
        tracing::info!(cart_key = cart.key(), items = cart.count(), "session closed");
        auth.logout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantstore_auth::Role;
    use plantstore_cart::MemoryStorage;
    use plantstore_client::InMemoryStore;
    use plantstore_core::UserId;
    use plantstore_products::{Category, Product};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn buyer(id: u64) -> User {
        User::new(UserId::new(id), "ivy", Role::Buyer, at()).unwrap()
    }

    fn product() -> Product {
        Product {
            id: plantstore_core::ProductId::new(1),
            name: "Fern".to_string(),
            description: "d".to_string(),
            price: dec!(10),
            category: Category::Plants,
            stock: 3,
            image: String::new(),
            seller_id: UserId::new(9),
            created_at: at(),
            updated_at: at(),
        }
    }

    #[test]
    fn cart_keys_are_per_user() {
        assert_eq!(cart_key(None), "cart");
        assert_eq!(cart_key(Some(&buyer(4))), "cart-user-4");
    }

    #[test]
    fn cart_survives_logout_and_login() {
        let storage = Arc::new(MemoryStorage::new());
        let gateway = Arc::new(InMemoryStore::new());
        let config = StoreConfig::default();

        let mut session = StoreSession::login(buyer(4), gateway.clone(), storage.clone(), &config);
        assert!(session.auth().is_authenticated());
        session.cart_mut().add(&product(), 2);
        let user = session.logout();
        assert_eq!(user.map(|u| u.id), Some(UserId::new(4)));

        let session = StoreSession::login(buyer(4), gateway.clone(), storage.clone(), &config);
        assert_eq!(session.cart().count(), 2);

        let other = StoreSession::login(buyer(5), gateway, storage, &config);
        assert!(other.cart().is_empty());
    }

    #[tokio::test]
    async fn anonymous_session_cannot_check_out() {
        let mut session = StoreSession::anonymous(
            Arc::new(InMemoryStore::new()),
            MemoryStorage::new(),
            &StoreConfig::default(),
        );
        session.cart_mut().add(&product(), 1);

        let err = session
            .checkout(&ShippingDetails::to("1 Moss St"), at())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::AuthenticationRequired);
        assert_eq!(session.cart().count(), 1);
    }
}
