//! Wishlist entries.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;

/// A wishlist entry.
///
/// Keyed by product alone; size and quantity only come into play once
/// the product moves to the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    /// Product this entry refers to.
    pub product_id: ProductId,
    /// Display title.
    pub title: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Primary image URL, if any.
    pub image: Option<String>,
    /// Gross unit price at add time.
    pub unit_price: Money,
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
    /// Stock level observed when the entry was added; advisory only.
    pub stock: i64,
    /// Size labels the product comes in.
    pub sizes: Vec<String>,
    /// Unix timestamp when the entry was added.
    pub added_at: i64,
}

impl WishlistItem {
    /// Snapshot a catalog product into a wishlist entry.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            slug: product.slug.clone(),
            image: product.image.clone(),
            unit_price: product.price,
            old_price: product.old_price,
            discount_percent: product.discount_percent,
            rating: product.rating,
            status: product.status.clone(),
            variant: product.variant.clone(),
            stock: product.stock,
            sizes: product.sizes.clone(),
            added_at: current_timestamp(),
        }
    }
}

/// Add a product to a wishlist collection, at most once.
pub fn add_once(items: &mut Vec<WishlistItem>, product: &Product) {
    if !items.iter().any(|i| i.product_id == product.id) {
        items.push(WishlistItem::from_product(product));
    }
}

/// Remove a product's entry, if present.
pub fn remove(items: &mut Vec<WishlistItem>, product_id: &ProductId) {
    items.retain(|i| &i.product_id != product_id);
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn product(id: &str) -> Product {
        Product::new(id, format!("Wine {id}"), id, Money::new(1190, Currency::EUR))
    }

    #[test]
    fn test_add_is_idempotent() {
        let p = product("wine-a");
        let mut items = Vec::new();
        add_once(&mut items, &p);
        add_once(&mut items, &p);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, p.id);
    }

    #[test]
    fn test_remove_clears_entry() {
        let p = product("wine-a");
        let mut items = Vec::new();
        add_once(&mut items, &p);
        remove(&mut items, &p.id);

        assert!(items.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut items = Vec::new();
        add_once(&mut items, &product("wine-a"));
        remove(&mut items, &ProductId::new("wine-b"));

        assert_eq!(items.len(), 1);
    }
}
