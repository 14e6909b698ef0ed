use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;

use plantstore_app::{SellerDashboard, StoreConfig, StoreSession, Storefront};
use plantstore_auth::{AuthSession, Role, User};
use plantstore_cart::{CartStorage, FileStorage, MemoryStorage};
use plantstore_checkout::ShippingDetails;
use plantstore_client::InMemoryStore;
use plantstore_core::UserId;
use plantstore_products::{CatalogQuery, Category, CategoryFilter, NewProduct, SortKey};

#[tokio::main]
async fn main() -> Result<()> {
    let config = StoreConfig::from_env().context("failed to load configuration")?;
    plantstore_observability::tracing::init(config.log_format);

    let storage: Arc<dyn CartStorage> = match &config.cart_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "saving carts to disk");
            Arc::new(FileStorage::new(dir))
        }
        None => Arc::new(MemoryStorage::new()),
    };
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();

    let seller = User::new(UserId::new(1), "greenhouse", Role::Seller, now)?;
    let buyer = User::new(UserId::new(2), "ivy", Role::Buyer, now)?.with_address("12 Fern Lane");

    let dashboard = SellerDashboard::new(store.clone(), config.aggregator());
    let seller_session = AuthSession::authenticated(seller);
    for (name, price, category, stock) in [
        ("Boston Fern", Decimal::new(1499, 2), Category::Plants, 12),
        ("Snake Plant", Decimal::new(2250, 2), Category::Plants, 4),
        ("Basil Seeds", Decimal::new(399, 2), Category::Seeds, 40),
        ("Hand Trowel", Decimal::new(950, 2), Category::GardeningTools, 0),
        ("Terracotta Pot", Decimal::new(1200, 2), Category::PotsAndPlanters, 8),
    ] {
        dashboard
            .add_product(
                &seller_session,
                NewProduct {
                    name: name.to_string(),
                    description: format!("{name} from the greenhouse"),
                    price,
                    category,
                    stock,
                    image: String::new(),
                },
            )
            .await?;
    }

    let mut storefront = Storefront::new(store.clone(), config.paginator()?);
    storefront.refresh(Some(&buyer)).await?;
    let query = CatalogQuery::new()
        .category(CategoryFilter::Only(Category::Plants))
        .sort(SortKey::PriceLow);
    let page = storefront.page(Some(&buyer), &query, 1);
    tracing::info!(
        matches = page.total_matches,
        pages = page.total_pages,
        "storefront page: {}",
        serde_json::to_string(&page.products.iter().map(|p| &p.name).collect::<Vec<_>>())?
    );

    let mut session = StoreSession::login(buyer, store.clone(), storage, &config);
    for product in &page.products {
        session.cart_mut().add(product, 2);
    }
    tracing::info!(
        items = session.cart().count(),
        total = %session.cart().total(),
        "cart ready"
    );

    session.open_confirmation();
    match session.checkout(&ShippingDetails::account_address(), Utc::now()).await {
        Ok(records) => tracing::info!(records = records.len(), "order placed"),
        Err(err) => tracing::warn!(error = %err, message = %err.user_message(), "checkout failed"),
    }
    session.logout();

    let view = dashboard.load(&seller_session).await?;
    tracing::info!(
        units = view.report.total_units,
        revenue = %view.report.total_revenue,
        orders = view.report.order_count,
        "sales report: {}",
        serde_json::to_string(&view.report.top)?
    );

    Ok(())
}
