use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plantstore_core::money::MONEY_SCALE;
use plantstore_core::{DomainError, DomainResult, Entity, ProductId, UserId};

/// Longest product name the store accepts.
pub const MAX_NAME_LEN: usize = 200;

/// Product category.
///
/// Serialized with the display names the storefront shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Plants,
    Seeds,
    #[serde(rename = "Gardening Tools")]
    GardeningTools,
    #[serde(rename = "Pots & Planters")]
    PotsAndPlanters,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Plants,
        Category::Seeds,
        Category::GardeningTools,
        Category::PotsAndPlanters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Plants => "Plants",
            Category::Seeds => "Seeds",
            Category::GardeningTools => "Gardening Tools",
            Category::PotsAndPlanters => "Pots & Planters",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("unknown category: {s}")))
    }
}

/// A product listing as delivered by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub stock: u32,
    /// Image reference (URL or upload path).
    #[serde(default)]
    pub image: String,
    pub seller_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Take `quantity` units out of stock for a sale.
    ///
    /// Fails without touching stock when not enough units are left.
    pub fn reserve(&mut self, quantity: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if self.stock < quantity {
            return Err(DomainError::validation(format!(
                "Not enough stock available. Only {} items left.",
                self.stock
            )));
        }
        self.stock -= quantity;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Input for listing a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image: String,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_price(self.price)?;
        Ok(())
    }

    /// Validate and materialize the listing under `seller_id`.
    pub fn into_product(
        self,
        id: ProductId,
        seller_id: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Product> {
        self.validate()?;
        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price.normalize(),
            category: self.category,
            stock: self.stock,
            image: self.image,
            seller_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a listing; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<Category>,
    pub stock: Option<u32>,
    pub image: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the update. Either every field is applied or, on a validation
    /// failure, none is.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }

        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price.normalize();
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        product.updated_at = now;
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name cannot be longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> DomainResult<()> {
    if description.trim().is_empty() {
        return Err(DomainError::validation("description cannot be empty"));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> DomainResult<()> {
    // DECIMAL(10, 2): eight integer digits, two fractional.
    let max = Decimal::new(100_000_000, 0);

    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::validation("price cannot be negative"));
    }
    if price.normalize().scale() > MONEY_SCALE {
        return Err(DomainError::validation("price can have at most 2 decimal places"));
    }
    if price >= max {
        return Err(DomainError::validation("price must be below 100000000"));
    }
    Ok(())
}
