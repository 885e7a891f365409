//! Cart, pricing, and checkout domain core for the Cellar wine storefront.
//!
//! The storefront's pages, CMS catalog, payment provider, and auth are
//! external collaborators; this crate holds the state the shop actually
//! owns:
//!
//! - **Money**: cents-based amounts, VAT-inclusive tax extraction,
//!   free-shipping threshold rule
//! - **Cart**: size-aware line items, wishlist, derived totals, the
//!   session-owned store persisted to device-local storage
//! - **Checkout**: bundle-aware bottle counting and the whole-case
//!   eligibility gate
//!
//! # Example
//!
//! ```rust,ignore
//! use cellar_commerce::prelude::*;
//! use cellar_kv::FileStore;
//!
//! let storage = FileStore::open(data_dir)?;
//! let mut cart = CartStore::open(storage);
//!
//! cart.add_item(&riesling, Some("standard"));
//! cart.add_item(&tasting_case, None);
//!
//! let totals = cart.totals(&PricingConfig::default());
//! println!("Due: {}", totals.grand_total.display());
//!
//! // Bottle-count gate before navigation to checkout.
//! let assessment = evaluate_checkout_eligibility(&cart.snapshot(), &catalog).await;
//! if !assessment.eligible {
//!     warn_user(assessment.units_to_next_case());
//! }
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::ProductId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::ProductId;
    pub use crate::money::{shipping_fee, Currency, Money};

    // Catalog
    pub use crate::catalog::{
        BundleComponent, Composition, CompositionSource, InMemoryCatalog, Product,
    };

    // Cart
    pub use crate::cart::{
        CartLineItem, CartSnapshot, CartState, CartStore, CartTotals, PricingConfig, WishlistItem,
        DEFAULT_VAT_RATE,
    };

    // Checkout
    pub use crate::checkout::{
        evaluate_checkout_eligibility, resolve_unit_count, CheckoutAssessment, CheckoutGate,
        GateState, CASE_SIZE,
    };
}
