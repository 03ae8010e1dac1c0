//! Cart Store
//!
//! The single owner of the shopper's pending item selection and the
//! cart-visibility flag. Every mutation is a synchronous, infallible
//! state transition; quantities are clamped against the stock snapshot
//! captured when the product was added, never re-validated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Add-time product snapshot, quantity excluded.
///
/// `stock_quantity` becomes the ceiling for this cart entry; later
/// changes to live stock do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Product identifier, unique within the cart.
    pub id: u64,

    /// Product display name.
    pub name: String,

    /// Unit price.
    pub price: Decimal,

    /// Optional product image URL.
    pub image_url: Option<String>,

    /// Stock ceiling snapshotted from the catalog.
    pub stock_quantity: u32,
}

/// A line in the cart.
///
/// Invariant: `1 <= quantity <= stock_quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique within the cart.
    pub id: u64,

    /// Product display name.
    pub name: String,

    /// Unit price.
    pub price: Decimal,

    /// Optional product image URL.
    pub image_url: Option<String>,

    /// Stock ceiling snapshotted at add time.
    pub stock_quantity: u32,

    /// Selected quantity.
    pub quantity: u32,
}

impl CartItem {
    fn from_new(new: NewCartItem, quantity: u32) -> Self {
        Self {
            id: new.id,
            name: new.name,
            price: new.price,
            image_url: new.image_url,
            stock_quantity: new.stock_quantity,
            quantity,
        }
    }

    /// Line total, `price * quantity`.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart aggregate: ordered items plus the panel-visibility flag.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
    is_open: bool,
}

impl Cart {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart, opening the cart panel.
    ///
    /// An existing entry with the same id absorbs the requested
    /// quantity additively; either way the stored quantity is clamped
    /// to `[1, stock_quantity]`. A snapshot with zero stock is never
    /// inserted, keeping every entry's quantity at least 1.
    pub fn add_item(&mut self, new: NewCartItem, quantity: u32) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == new.id) {
            existing.quantity = existing
                .quantity
                .saturating_add(quantity)
                .min(existing.stock_quantity);
        } else if new.stock_quantity > 0 {
            let quantity = quantity.clamp(1, new.stock_quantity);
            self.items.push(CartItem::from_new(new, quantity));
        }

        self.is_open = true;
    }

    /// Remove the entry with the given id. Absent ids are a no-op.
    pub fn remove_item(&mut self, id: u64) {
        self.items.retain(|item| item.id != id);
    }

    /// Set an entry's quantity, clamped to `[1, stock_quantity]`.
    ///
    /// The lower bound means this can never drive a quantity to zero;
    /// use [`Cart::remove_item`] to drop a line. Absent ids are a
    /// no-op.
    pub fn update_quantity(&mut self, id: u64, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity.clamp(1, item.stock_quantity);
        }
    }

    /// Empty the cart without touching the visibility flag.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Show the cart panel.
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Hide the cart panel.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Derived total, recomputed on every call.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up an entry by product id.
    pub fn get(&self, id: u64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart panel is visible.
    pub fn is_open(&self) -> bool {
        self.is_open
    }
}
