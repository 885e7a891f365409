//! Shopping cart module.
//!
//! Contains the line-item model, the wishlist, pricing breakdowns, and
//! the session-owned cart store.

pub mod line_item;
mod pricing;
mod store;
pub mod wishlist;

pub use line_item::CartLineItem;
pub use pricing::{CartTotals, PricingConfig, DEFAULT_VAT_RATE};
pub use store::{CartSnapshot, CartState, CartStore};
pub use wishlist::WishlistItem;
