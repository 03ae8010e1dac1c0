//! SaveGo application layer: REST client for the storefront API,
//! session persistence, debounced search suggestions, and the checkout
//! flow over the pure stores in the `savego` core crate.

pub mod api;
pub mod checkout;
pub mod search;
pub mod session_store;
