use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal_macros::dec;

use plantstore_app::{SellerDashboard, StoreConfig, StoreSession, Storefront};
use plantstore_auth::{AuthSession, Role, User};
use plantstore_cart::{CartStorage, FileStorage, MemoryStorage};
use plantstore_checkout::{CheckoutError, CheckoutState, ShippingDetails};
use plantstore_client::{InMemoryStore, RemoteError, StoreGateway};
use plantstore_core::UserId;
use plantstore_products::{CatalogQuery, Category, CategoryFilter, NewProduct, Product};
use plantstore_sales::SaleStatus;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

fn seller() -> User {
    User::new(UserId::new(1), "greenhouse", Role::Seller, at(0)).unwrap()
}

fn buyer() -> User {
    User::new(UserId::new(2), "ivy", Role::Buyer, at(0))
        .unwrap()
        .with_address("12 Fern Lane")
}

async fn seeded() -> (Arc<InMemoryStore>, Product, Product) {
    let store = Arc::new(InMemoryStore::new());
    let dashboard = SellerDashboard::new(store.clone(), StoreConfig::default().aggregator());
    let seller = AuthSession::authenticated(seller());

    let fern = dashboard
        .add_product(
            &seller,
            NewProduct {
                name: "Fern".to_string(),
                description: "Leafy".to_string(),
                price: dec!(10),
                category: Category::Plants,
                stock: 5,
                image: String::new(),
            },
        )
        .await
        .unwrap();
    let trowel = dashboard
        .add_product(
            &seller,
            NewProduct {
                name: "Trowel".to_string(),
                description: "Steel".to_string(),
                price: dec!(5),
                category: Category::GardeningTools,
                stock: 5,
                image: String::new(),
            },
        )
        .await
        .unwrap();
    (store, fern, trowel)
}

#[tokio::test]
async fn browse_buy_and_report() {
    let (store, fern, trowel) = seeded().await;
    let config = StoreConfig::default();

    let mut storefront = Storefront::new(store.clone(), config.paginator().unwrap());
    storefront.refresh(Some(&buyer())).await.unwrap();
    let plants = storefront.page(
        Some(&buyer()),
        &CatalogQuery::new().category(CategoryFilter::Only(Category::Plants)),
        1,
    );
    assert_eq!(plants.products.len(), 1);
    assert_eq!(plants.products[0].id, fern.id);

    let mut session = StoreSession::login(buyer(), store.clone(), MemoryStorage::new(), &config);
    session.cart_mut().add(&fern, 3);
    session.cart_mut().add(&trowel, 1);
    session.cart_mut().add(&fern, 0);
    assert_eq!(session.cart().total(), dec!(35));

    session.open_confirmation();
    let records = session
        .checkout(&ShippingDetails::account_address(), at(10))
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(session.cart().is_empty());
    assert!(!session.checkout_processor().is_confirming());
    assert!(session.checkout_processor().notice_at(at(12)).is_some());
    assert!(session.checkout_processor().notice_at(at(13)).is_none());

    let dashboard = SellerDashboard::new(store.clone(), config.aggregator());
    let view = dashboard.load(&AuthSession::authenticated(seller())).await.unwrap();
    assert_eq!(view.report.total_units, 4);
    assert_eq!(view.report.total_revenue, dec!(35));
    assert_eq!(view.report.top[0].product_id, fern.id);
    assert_eq!(view.report.bottom[0].product_id, trowel.id);
    assert_eq!(view.report.units_by_status.get(&SaleStatus::Pending), Some(&4));
}

#[tokio::test]
async fn blank_address_sends_nothing() {
    let (store, fern, _) = seeded().await;
    let mut session =
        StoreSession::login(buyer(), store.clone(), MemoryStorage::new(), &StoreConfig::default());
    session.cart_mut().add(&fern, 1);

    let err = session
        .checkout(&ShippingDetails::to(""), at(0))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Validation(_)));
    assert_eq!(store.sale_count(), 0);
    assert_eq!(session.cart().count(), 1);
    assert_eq!(session.checkout_processor().state(), CheckoutState::Failed);
}

#[tokio::test]
async fn failed_line_keeps_cart_and_retry_completes_without_duplicates() {
    let (store, fern, trowel) = seeded().await;
    let mut session =
        StoreSession::login(buyer(), store.clone(), MemoryStorage::new(), &StoreConfig::default());
    session.cart_mut().add(&fern, 2);
    session.cart_mut().add(&trowel, 2);

    store
        .fail_sales_for(trowel.id, RemoteError::Transport("connection reset".into()))
        .unwrap();
    let err = session
        .checkout(&ShippingDetails::to("1 Moss St"), at(0))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Remote { .. }));
    assert_eq!(session.cart().count(), 4);

    store.clear_failures().unwrap();
    session
        .checkout(&ShippingDetails::to("1 Moss St"), at(1))
        .await
        .unwrap();

    let sales = store.fetch_sale_records().await.unwrap();
    assert_eq!(sales.len(), 2);
    let products = store.fetch_products(Some(&seller())).await.unwrap();
    assert!(products.iter().all(|p| p.stock == 3));
}

#[tokio::test]
async fn over_ordering_shows_the_stock_message() {
    let (store, fern, _) = seeded().await;
    let mut session =
        StoreSession::login(buyer(), store.clone(), MemoryStorage::new(), &StoreConfig::default());
    session.cart_mut().add(&fern, 9);

    let err = session
        .checkout(&ShippingDetails::account_address(), at(0))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Not enough stock available. Only 5 items left.");
}

#[tokio::test]
async fn sold_out_products_leave_the_storefront() {
    let (store, fern, _) = seeded().await;
    let config = StoreConfig::default();
    let mut session = StoreSession::login(buyer(), store.clone(), MemoryStorage::new(), &config);
    session.cart_mut().add(&fern, 5);
    session
        .checkout(&ShippingDetails::account_address(), at(0))
        .await
        .unwrap();

    let mut storefront = Storefront::new(store.clone(), config.paginator().unwrap());
    storefront.refresh(Some(&buyer())).await.unwrap();
    let page = storefront.page(Some(&buyer()), &CatalogQuery::new(), 1);
    assert!(page.products.iter().all(|p| p.id != fern.id));

    storefront.refresh(Some(&seller())).await.unwrap();
    let page = storefront.page(Some(&seller()), &CatalogQuery::new(), 1);
    assert!(page.products.iter().any(|p| p.id == fern.id && p.stock == 0));
}

#[tokio::test]
async fn cart_is_restored_from_disk_after_restart() {
    let dir = std::env::temp_dir().join(format!("plantstore-flow-{}", Utc::now().timestamp_nanos_opt().unwrap_or(0)));
    let (store, fern, _) = seeded().await;
    let config = StoreConfig {
        cart_dir: Some(dir.clone()),
        notice_secs: 1,
        ..StoreConfig::default()
    };
    let storage = |config: &StoreConfig| -> Arc<dyn CartStorage> {
        Arc::new(FileStorage::new(config.cart_dir.clone().unwrap()))
    };

    let mut session = StoreSession::login(buyer(), store.clone(), storage(&config), &config);
    session.cart_mut().add(&fern, 2);
    session.logout();

    let mut session = StoreSession::login(buyer(), store.clone(), storage(&config), &config);
    assert_eq!(session.cart().count(), 2);
    assert_eq!(session.cart().total(), dec!(20));

    session
        .checkout(&ShippingDetails::account_address(), at(0))
        .await
        .unwrap();
    assert!(session.checkout_processor().notice_at(at(0) + TimeDelta::milliseconds(500)).is_some());
    assert!(session.checkout_processor().notice_at(at(1)).is_none());

    let reopened = StoreSession::login(buyer(), store, storage(&config), &config);
    assert!(reopened.cart().is_empty());

    let _ = std::fs::remove_dir_all(dir);
}
