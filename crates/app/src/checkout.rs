//! Checkout flow.
//!
//! Builds the order payload from the cart, submits it, and clears the
//! cart on success. A rejected submission leaves the cart untouched so
//! the shopper can simply resubmit; there is no automatic retry.

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::info;

use savego::cart::Cart;

use crate::api::{ApiError, NewOrder, NewOrderItem, Order, StorefrontApi};

/// Contact and delivery details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    /// Recipient name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    pub phone: String,

    /// Delivery address.
    pub address: String,
}

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The backend rejected or failed the submission.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Order submission service over the storefront API.
pub struct Checkout {
    api: Arc<dyn StorefrontApi>,
}

impl fmt::Debug for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout").finish_non_exhaustive()
    }
}

impl Checkout {
    /// Create a checkout service.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Submit the cart as an order.
    ///
    /// On success the cart is cleared and the placed order returned;
    /// on failure the cart is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] without calling the
    /// backend when the cart holds no items, or the API error from a
    /// failed submission.
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        form: OrderForm,
        bearer: Option<String>,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = NewOrder {
            name: form.name,
            email: form.email,
            phone: form.phone,
            address: form.address,
            items: cart
                .items()
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.id,
                    quantity: item.quantity,
                })
                .collect(),
        };

        let placed = self.api.submit_order(order, bearer).await?;

        cart.clear();
        info!(order_number = %placed.order_number, "order placed");

        Ok(placed)
    }
}
