use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plantstore_core::{ProductId, UserId};
use plantstore_products::{Category, Product};

/// Copy of the product fields a cart needs, taken when the line was added.
///
/// Later price or stock changes in the catalog do not reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    pub seller_id: UserId,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category,
            image: product.image.clone(),
            seller_id: product.seller_id,
        }
    }
}

impl From<Product> for ProductSnapshot {
    fn from(product: Product) -> Self {
        Self::from(&product)
    }
}

/// One product + quantity entry. Stored flat: `{"id": .., "name": .., "quantity": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartLine {
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// `price * quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}
