//! Catalog product shape.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as supplied by the catalog collaborator.
///
/// Read-only from the cart's point of view: the store snapshots the
/// fields it needs at add time and never writes back. The stock count
/// is advisory and may be stale by the time the user acts on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Primary image URL, if any.
    pub image: Option<String>,
    /// Current gross price.
    pub price: Money,
    /// Original price before a markdown.
    pub old_price: Option<Money>,
    /// Discount percentage as shown on the product card.
    pub discount_percent: Option<f64>,
    /// Customer rating, 0 to 5.
    pub rating: f32,
    /// Status tag (e.g., "new", "bestseller").
    pub status: Option<String>,
    /// Variant tag (e.g., grape or vintage).
    pub variant: Option<String>,
    /// Stock count, non-negative.
    pub stock: i64,
    /// Size labels the product comes in (e.g., bottle formats).
    pub sizes: Vec<String>,
}

impl Product {
    /// Create a product with the required fields; the rest start empty.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            image: None,
            price,
            old_price: None,
            discount_percent: None,
            rating: 0.0,
            status: None,
            variant: None,
            stock: 0,
            sizes: Vec::new(),
        }
    }

    /// Check if any stock is left.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check if the product is marked down from an old price.
    pub fn is_on_sale(&self) -> bool {
        self.old_price
            .map(|old| old.amount_cents > self.price.amount_cents)
            .unwrap_or(false)
    }

    /// Calculate the markdown percentage against the old price.
    pub fn markdown_percentage(&self) -> Option<f64> {
        self.old_price.and_then(|old| {
            if old.amount_cents > self.price.amount_cents {
                let savings = old.amount_cents - self.price.amount_cents;
                Some((savings as f64 / old.amount_cents as f64) * 100.0)
            } else {
                None
            }
        })
    }

    /// Check if the product comes in multiple sizes.
    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }
}
