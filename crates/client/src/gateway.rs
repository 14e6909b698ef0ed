use std::sync::Arc;

use async_trait::async_trait;

use plantstore_auth::User;
use plantstore_core::{ProductId, SaleRecordId};
use plantstore_products::{NewProduct, Product, ProductUpdate};
use plantstore_sales::{NewSaleRecord, SaleRecord, SaleStatus};

use crate::RemoteError;

/// Calls the domain layer makes against the store's API.
///
/// The acting user is passed explicitly; implementations backed by a real
/// session derive it from the session instead and may ignore the argument.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// `fetchProducts()`: listings visible to `viewer` (sellers see
    /// out-of-stock products too), newest first.
    async fn fetch_products(&self, viewer: Option<&User>) -> Result<Vec<Product>, RemoteError>;

    /// `fetchSaleRecords()`: every sale record, newest first.
    async fn fetch_sale_records(&self) -> Result<Vec<SaleRecord>, RemoteError>;

    /// `createSaleRecord(...)`: record a purchase by `buyer`. Takes the units
    /// out of stock. A request carrying an idempotency key that was already
    /// used returns the original record.
    async fn create_sale_record(
        &self,
        buyer: &User,
        request: NewSaleRecord,
    ) -> Result<SaleRecord, RemoteError>;

    async fn create_product(&self, seller: &User, input: NewProduct) -> Result<Product, RemoteError>;

    async fn update_product(
        &self,
        seller: &User,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, RemoteError>;

    async fn delete_product(&self, seller: &User, product_id: ProductId) -> Result<(), RemoteError>;

    /// Seller-side order status change.
    async fn update_sale_status(
        &self,
        seller: &User,
        sale_id: SaleRecordId,
        status: SaleStatus,
    ) -> Result<SaleRecord, RemoteError>;
}

#[async_trait]
impl<G> StoreGateway for Arc<G>
where
    G: StoreGateway + ?Sized,
{
    async fn fetch_products(&self, viewer: Option<&User>) -> Result<Vec<Product>, RemoteError> {
        (**self).fetch_products(viewer).await
    }

    async fn fetch_sale_records(&self) -> Result<Vec<SaleRecord>, RemoteError> {
        (**self).fetch_sale_records().await
    }

    async fn create_sale_record(
        &self,
        buyer: &User,
        request: NewSaleRecord,
    ) -> Result<SaleRecord, RemoteError> {
        (**self).create_sale_record(buyer, request).await
    }

    async fn create_product(&self, seller: &User, input: NewProduct) -> Result<Product, RemoteError> {
        (**self).create_product(seller, input).await
    }

    async fn update_product(
        &self,
        seller: &User,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, RemoteError> {
        (**self).update_product(seller, product_id, update).await
    }

    async fn delete_product(&self, seller: &User, product_id: ProductId) -> Result<(), RemoteError> {
        (**self).delete_product(seller, product_id).await
    }

    async fn update_sale_status(
        &self,
        seller: &User,
        sale_id: SaleRecordId,
        status: SaleStatus,
    ) -> Result<SaleRecord, RemoteError> {
        (**self).update_sale_status(seller, sale_id, status).await
    }
}
