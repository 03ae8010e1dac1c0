//! Catalog records
//!
//! Product and category shapes as served by the catalog collaborator.
//! Field names match its JSON wire format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    pub id: u64,

    /// Category display name.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: u64,

    /// Product display name.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price.
    pub price: Decimal,

    /// Units currently in stock.
    pub stock_quantity: u32,

    /// Optional product image URL.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Whether the product is offered for sale.
    pub is_active: bool,

    /// Owning category, if assigned.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Product {
    /// Whether any units can be added to a cart.
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}
