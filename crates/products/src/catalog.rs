//! Storefront catalog derivation.
//!
//! The catalog is the full, materialized product list fetched from the store.
//! Every view (storefront grid, seller listing) is recomputed from it on each
//! change; there is no incremental or cached state.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use plantstore_auth::User;
use plantstore_core::{DomainError, ProductId, UserId, find_by_id};

use crate::{Category, Product};

/// Category facet of a catalog query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        CategoryFilter::Only(value)
    }
}

/// Sort order of a catalog query. Every order is stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the store's order (newest first).
    #[default]
    Newest,
    /// Name, ascending, ignoring case.
    Name,
    /// Price, ascending.
    PriceLow,
    /// Price, descending.
    PriceHigh,
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "newest" => Ok(SortKey::Newest),
            "name" => Ok(SortKey::Name),
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            other => Err(DomainError::validation(format!("unknown sort key: {other}"))),
        }
    }
}

/// Filter + search + sort over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub category: CategoryFilter,
    /// Case-insensitive substring of name or description. Empty matches all.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: SortKey,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Apply the query: filter, then stable sort.
    pub fn apply<'a, I>(&self, products: I) -> Vec<&'a Product>
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let needle = self.search.to_lowercase();
        let mut out: Vec<&Product> = products
            .into_iter()
            .filter(|p| self.category.matches(p.category))
            .filter(|p| needle.is_empty() || matches_text(p, &needle))
            .collect();

        match self.sort {
            SortKey::Newest => {}
            SortKey::Name => out.sort_by_cached_key(|p| p.name.to_lowercase()),
            SortKey::PriceLow => out.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceHigh => out.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        out
    }
}

fn matches_text(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

/// The queryable in-memory set of products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Wrap a fetched product list. Input order is the "newest first" order.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        find_by_id(&self.products, id)
    }

    /// Replace the product list after a refetch.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Products a viewer may browse: sellers see everything, everyone else
    /// only what is in stock.
    pub fn visible_to(&self, viewer: Option<&User>) -> Vec<&Product> {
        let show_all = viewer.is_some_and(User::is_seller);
        self.products
            .iter()
            .filter(|p| show_all || p.is_in_stock())
            .collect()
    }

    /// A seller's own listings, in catalog order.
    pub fn owned_by(&self, seller_id: UserId) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.seller_id == seller_id)
            .collect()
    }

    /// Apply `query` to the whole catalog, ignoring visibility.
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        query.apply(&self.products)
    }

    /// Apply `query` to what `viewer` may see.
    pub fn query_as(&self, viewer: Option<&User>, query: &CatalogQuery) -> Vec<&Product> {
        query.apply(self.visible_to(viewer))
    }
}

impl FromIterator<Product> for ProductCatalog {
    fn from_iter<T: IntoIterator<Item = Product>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
