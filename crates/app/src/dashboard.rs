use serde::Serialize;
use thiserror::Error;

use plantstore_auth::{AuthSession, AuthzError, User, require_seller};
use plantstore_client::{RemoteError, StoreGateway};
use plantstore_core::{ProductId, SaleRecordId};
use plantstore_products::{NewProduct, Product, ProductUpdate};
use plantstore_sales::{SaleRecord, SaleStatus, SalesAggregator, SalesReport, sales_for_seller};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// What a seller sees on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    /// The seller's own listings, out-of-stock ones included.
    pub products: Vec<Product>,
    /// Sales of those listings, newest first.
    pub sales: Vec<SaleRecord>,
    pub report: SalesReport,
}

/// Seller-only product management and sales statistics.
#[derive(Debug)]
pub struct SellerDashboard<G> {
    gateway: G,
    aggregator: SalesAggregator,
}

impl<G: StoreGateway> SellerDashboard<G> {
    pub fn new(gateway: G, aggregator: SalesAggregator) -> Self {
        Self { gateway, aggregator }
    }

    pub async fn load(&self, session: &AuthSession) -> Result<DashboardView, DashboardError> {
        let seller = require_seller(session, "view the dashboard")?;
        let (products, sales) = self.fetch(seller).await?;

        let own_sales: Vec<SaleRecord> = sales_for_seller(seller.id, &products, &sales)
            .into_iter()
            .cloned()
            .collect();
        let own_products: Vec<Product> = products
            .into_iter()
            .filter(|p| p.seller_id == seller.id)
            .collect();
        let report = self.aggregator.aggregate(&own_products, &own_sales);

        tracing::debug!(
            seller_id = %seller.id,
            products = own_products.len(),
            sales = own_sales.len(),
            "dashboard loaded"
        );
        Ok(DashboardView {
            products: own_products,
            sales: own_sales,
            report,
        })
    }

    pub async fn add_product(
        &self,
        session: &AuthSession,
        input: NewProduct,
    ) -> Result<Product, DashboardError> {
        let seller = require_seller(session, "add products")?;
        Ok(self.gateway.create_product(seller, input).await?)
    }

    pub async fn edit_product(
        &self,
        session: &AuthSession,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, DashboardError> {
        let seller = require_seller(session, "edit products")?;
        Ok(self.gateway.update_product(seller, product_id, update).await?)
    }

    pub async fn delete_product(
        &self,
        session: &AuthSession,
        product_id: ProductId,
    ) -> Result<(), DashboardError> {
        let seller = require_seller(session, "delete products")?;
        Ok(self.gateway.delete_product(seller, product_id).await?)
    }

    pub async fn set_order_status(
        &self,
        session: &AuthSession,
        sale_id: SaleRecordId,
        status: SaleStatus,
    ) -> Result<SaleRecord, DashboardError> {
        let seller = require_seller(session, "update orders")?;
        Ok(self.gateway.update_sale_status(seller, sale_id, status).await?)
    }

    async fn fetch(&self, seller: &User) -> Result<(Vec<Product>, Vec<SaleRecord>), RemoteError> {
        let products = self.gateway.fetch_products(Some(seller)).await?;
        let sales = self.gateway.fetch_sale_records().await?;
        Ok((products, sales))
    }
}
