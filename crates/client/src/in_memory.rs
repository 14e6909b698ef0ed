use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use plantstore_auth::{AuthzError, User, require_owner};
use plantstore_core::{DomainError, IdempotencyKey, ProductId, SaleRecordId, find_by_id, find_by_id_mut};
use plantstore_products::{NewProduct, Product, ProductUpdate};
use plantstore_sales::{NewSaleRecord, SaleRecord, SaleStatus, newest_first};

use crate::{RemoteError, StoreGateway};

#[derive(Debug, Default)]
struct StoreState {
    products: Vec<Product>,
    sales: Vec<SaleRecord>,
    by_idempotency_key: HashMap<IdempotencyKey, SaleRecordId>,
    last_product_id: u64,
    last_sale_id: u64,
    /// Injected failures for sale creation, keyed by product.
    failing_sales: HashMap<ProductId, RemoteError>,
    offline: bool,
}

impl StoreState {
    fn product_mut(&mut self, id: ProductId) -> Result<&mut Product, RemoteError> {
        find_by_id_mut(&mut self.products, id)
            .ok_or_else(|| RemoteError::NotFound(format!("product {id}")))
    }
}

/// In-process stand-in for the store's API server.
///
/// Applies the server's rules: buyers only list stocked products, only
/// sellers manage listings and only their own, creating a sale takes stock,
/// and a repeated idempotency key returns the first record.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed product (fixtures, demo data). Keeps the id
    /// counter ahead of seeded ids.
    pub fn seed_product(&self, product: Product) -> Result<(), RemoteError> {
        let mut state = self.write()?;
        state.last_product_id = state.last_product_id.max(product.id.get());
        state.products.retain(|p| p.id != product.id);
        state.products.push(product);
        Ok(())
    }

    /// Make every sale creation for `product_id` fail with `error`.
    pub fn fail_sales_for(&self, product_id: ProductId, error: RemoteError) -> Result<(), RemoteError> {
        self.write()?.failing_sales.insert(product_id, error);
        Ok(())
    }

    pub fn clear_failures(&self) -> Result<(), RemoteError> {
        self.write()?.failing_sales.clear();
        Ok(())
    }

    /// Simulate the server being unreachable.
    pub fn set_offline(&self, offline: bool) -> Result<(), RemoteError> {
        self.write()?.offline = offline;
        Ok(())
    }

    /// Number of sale records held (including ones not visible to anyone).
    pub fn sale_count(&self) -> usize {
        self.inner.read().map(|s| s.sales.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>, RemoteError> {
        let state = self
            .inner
            .read()
            .map_err(|_| RemoteError::Server("store lock poisoned".to_string()))?;
        if state.offline {
            return Err(RemoteError::Transport("store is offline".to_string()));
        }
        Ok(state)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreState>, RemoteError> {
        self.inner
            .write()
            .map_err(|_| RemoteError::Server("store lock poisoned".to_string()))
    }

    fn write_online(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreState>, RemoteError> {
        let state = self.write()?;
        if state.offline {
            return Err(RemoteError::Transport("store is offline".to_string()));
        }
        Ok(state)
    }
}

fn require_seller_user(user: &User, action: &'static str) -> Result<(), RemoteError> {
    if user.is_seller() {
        Ok(())
    } else {
        Err(RemoteError::Forbidden(AuthzError::SellerOnly(action).to_string()))
    }
}

fn forbidden(err: AuthzError) -> RemoteError {
    RemoteError::Forbidden(err.to_string())
}

#[async_trait]
impl StoreGateway for InMemoryStore {
    async fn fetch_products(&self, viewer: Option<&User>) -> Result<Vec<Product>, RemoteError> {
        let state = self.read()?;
        let show_all = viewer.is_some_and(User::is_seller);
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| show_all || p.is_in_stock())
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }

    async fn fetch_sale_records(&self) -> Result<Vec<SaleRecord>, RemoteError> {
        let mut sales = self.read()?.sales.clone();
        newest_first(&mut sales);
        Ok(sales)
    }

    async fn create_sale_record(
        &self,
        buyer: &User,
        request: NewSaleRecord,
    ) -> Result<SaleRecord, RemoteError> {
        let mut state = self.write_online()?;

        if let Some(key) = request.idempotency_key {
            if let Some(existing_id) = state.by_idempotency_key.get(&key) {
                if let Some(existing) = find_by_id(&state.sales, *existing_id) {
                    if existing.buyer_id != buyer.id {
                        tracing::warn!(
                            %key,
                            buyer_id = buyer.id.get(),
                            "idempotency key reused by another buyer"
                        );
                        return Err(RemoteError::rejected(
                            "idempotency_key",
                            "This key belongs to another order.",
                        ));
                    }
                    tracing::debug!(sale_id = %existing.id, %key, "replayed sale creation");
                    return Ok(existing.clone());
                }
            }
        }

        if let Some(err) = state.failing_sales.get(&request.product_id) {
            return Err(err.clone());
        }

        request.validate()?;

        let now = Utc::now();
        let product_id = request.product_id;
        let product = state.product_mut(product_id).map_err(|_| {
            RemoteError::rejected(
                "product_id",
                format!("Invalid pk \"{product_id}\" - object does not exist."),
            )
        })?;
        product.reserve(request.quantity, now).map_err(|err| match err {
            DomainError::Validation(msg) => RemoteError::rejected("quantity", msg),
            other => RemoteError::from(other),
        })?;

        state.last_sale_id += 1;
        let id = SaleRecordId::new(state.last_sale_id);
        let record = request.into_record(id, buyer.id, now)?;

        if let Some(key) = record.idempotency_key {
            state.by_idempotency_key.insert(key, id);
        }
        state.sales.push(record.clone());

        tracing::info!(
            sale_id = %record.id,
            product_id = %record.product_id,
            buyer_id = %record.buyer_id,
            quantity = record.quantity,
            "sale record created"
        );
        Ok(record)
    }

    async fn create_product(&self, seller: &User, input: NewProduct) -> Result<Product, RemoteError> {
        require_seller_user(seller, "add products")?;
        let mut state = self.write_online()?;

        let id = ProductId::new(state.last_product_id + 1);
        let product = input.into_product(id, seller.id, Utc::now())?;
        state.last_product_id = id.get();
        state.products.push(product.clone());

        tracing::info!(product_id = %id, seller_id = %seller.id, "product created");
        Ok(product)
    }

    async fn update_product(
        &self,
        seller: &User,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, RemoteError> {
        require_seller_user(seller, "edit products")?;
        let mut state = self.write_online()?;

        let product = state.product_mut(product_id)?;
        require_owner(seller, product.seller_id).map_err(forbidden)?;

        update.apply(product, Utc::now())?;
        let updated = product.clone();

        tracing::info!(product_id = %product_id, "product updated");
        Ok(updated)
    }

    async fn delete_product(&self, seller: &User, product_id: ProductId) -> Result<(), RemoteError> {
        require_seller_user(seller, "delete products")?;
        let mut state = self.write_online()?;

        let product = state.product_mut(product_id)?;
        require_owner(seller, product.seller_id).map_err(forbidden)?;

        if state.sales.iter().any(|s| s.product_id == product_id) {
            return Err(RemoteError::rejected(
                "product_id",
                "This product has sales and cannot be deleted. Set its stock to 0 instead.",
            ));
        }
        state.products.retain(|p| p.id != product_id);

        tracing::info!(product_id = %product_id, "product deleted");
        Ok(())
    }

    async fn update_sale_status(
        &self,
        seller: &User,
        sale_id: SaleRecordId,
        status: SaleStatus,
    ) -> Result<SaleRecord, RemoteError> {
        require_seller_user(seller, "update orders")?;
        let mut state = self.write_online()?;

        let product_id = find_by_id(&state.sales, sale_id)
            .map(|s| s.product_id)
            .ok_or_else(|| RemoteError::NotFound(format!("sale {sale_id}")))?;
        let owner = state.product_mut(product_id)?.seller_id;
        require_owner(seller, owner).map_err(forbidden)?;

        let sale = find_by_id_mut(&mut state.sales, sale_id)
            .ok_or_else(|| RemoteError::NotFound(format!("sale {sale_id}")))?;
        sale.transition(status, Utc::now())?;

        tracing::info!(sale_id = %sale_id, status = %status, "sale status updated");
        Ok(sale.clone())
    }
}
