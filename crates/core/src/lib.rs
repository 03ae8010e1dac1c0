//! SaveGo
//!
//! SaveGo is the client-side core of a grocery wholesale storefront: the
//! cart and session state containers and the catalog filter pipeline.
//! Everything here is pure, synchronous local state; network and
//! persistence live in the application crate.

pub mod cart;
pub mod filter;
pub mod products;
pub mod session;
