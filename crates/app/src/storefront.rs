use serde::Serialize;

use plantstore_auth::User;
use plantstore_client::{RemoteError, StoreGateway};
use plantstore_products::{CatalogQuery, Paginator, Product, ProductCatalog};

/// One rendered page of the storefront grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorefrontPage {
    pub products: Vec<Product>,
    /// The page actually shown (requested page, clamped into range).
    pub page: usize,
    pub total_pages: usize,
    /// Products matching the query across all pages.
    pub total_matches: usize,
}

/// Product browsing: fetch once, then filter, sort and page locally.
#[derive(Debug)]
pub struct Storefront<G> {
    gateway: G,
    catalog: ProductCatalog,
    paginator: Paginator,
}

impl<G: StoreGateway> Storefront<G> {
    pub fn new(gateway: G, paginator: Paginator) -> Self {
        Self {
            gateway,
            catalog: ProductCatalog::default(),
            paginator,
        }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Refetch the product list. On failure the previous list is kept.
    pub async fn refresh(&mut self, viewer: Option<&User>) -> Result<usize, RemoteError> {
        let products = self.gateway.fetch_products(viewer).await.map_err(|err| {
            tracing::warn!(error = %err, "failed to fetch products");
            err
        })?;
        self.catalog.replace(products);
        tracing::debug!(products = self.catalog.len(), "catalog refreshed");
        Ok(self.catalog.len())
    }

    pub fn page(&self, viewer: Option<&User>, query: &CatalogQuery, page: usize) -> StorefrontPage {
        let matches = self.catalog.query_as(viewer, query);
        let page = self.paginator.clamp(page, matches.len());
        StorefrontPage {
            products: self
                .paginator
                .page(&matches, page)
                .iter()
                .map(|p| (*p).clone())
                .collect(),
            page,
            total_pages: self.paginator.total_pages(matches.len()),
            total_matches: matches.len(),
        }
    }
}
