//! Cart line items and the collection operations over them.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;

/// A line item in the cart.
///
/// Identity is the (product, selected size) pair: the same wine in two
/// bottle formats makes two lines. The remaining fields are a snapshot
/// of the catalog product at add time; totals are computed from the
/// snapshot price stored here, never from a re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Product this line refers to.
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
    /// Stock level observed when the line was added; advisory only.
    pub stock: i64,
    /// Size labels the product comes in.
    pub sizes: Vec<String>,
    /// Quantity, always at least 1 while the line exists.
    pub quantity: i64,
    /// Chosen size label, if the product has sizes.
    pub selected_size: Option<String>,
    /// Unix timestamp when the line was first added.
    pub added_at: i64,
}

impl CartLineItem {
    /// Snapshot a catalog product into a new line with quantity 1.
    pub fn from_product(product: &Product, selected_size: Option<&str>) -> Self {
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
            quantity: 1,
            selected_size: selected_size.map(str::to_string),
            added_at: current_timestamp(),
        }
    }

    /// Composite identity: product plus selected size.
    ///
    /// An absent size and a missing size label are the same key value.
    pub fn key(&self) -> (&ProductId, Option<&str>) {
        (&self.product_id, self.selected_size.as_deref())
    }

    /// Check whether this line carries the given key.
    pub fn matches(&self, product_id: &ProductId, selected_size: Option<&str>) -> bool {
        &self.product_id == product_id && self.selected_size.as_deref() == selected_size
    }

    /// Line total at the stored snapshot price.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Total savings against the old price, if the line is marked down.
    pub fn savings(&self) -> Option<Money> {
        self.old_price.and_then(|old| {
            if old.amount_cents > self.unit_price.amount_cents {
                old.try_subtract(&self.unit_price)
                    .map(|per_unit| per_unit.multiply(self.quantity))
            } else {
                None
            }
        })
    }
}

/// Merge a quantity delta into a line collection.
///
/// The single building block behind add, increment, decrement, and
/// remove-one. An existing line's quantity moves by `delta`, clamped at
/// zero; a line at zero is dropped rather than stored. With no matching
/// line, a positive delta appends a new line and a non-positive delta
/// is a no-op.
pub fn upsert_quantity(
    items: &mut Vec<CartLineItem>,
    product: &Product,
    selected_size: Option<&str>,
    delta: i64,
) {
    if let Some(pos) = items
        .iter()
        .position(|i| i.matches(&product.id, selected_size))
    {
        let next = (items[pos].quantity + delta).max(0);
        if next == 0 {
            items.remove(pos);
        } else {
            items[pos].quantity = next;
        }
    } else if delta > 0 {
        let mut line = CartLineItem::from_product(product, selected_size);
        line.quantity = delta;
        items.push(line);
    }
}

/// Decrement the first-added line for a product by one.
///
/// The decrement target is size-insensitive; with several size-variant
/// lines in the cart the earliest-added one takes the hit. A line that
/// reaches zero quantity is dropped.
pub fn decrement_first(items: &mut Vec<CartLineItem>, product_id: &ProductId) {
    if let Some(pos) = items.iter().position(|i| &i.product_id == product_id) {
        items[pos].quantity -= 1;
        if items[pos].quantity <= 0 {
            items.remove(pos);
        }
    }
}

/// Drop every line for a product, regardless of size.
pub fn remove_all(items: &mut Vec<CartLineItem>, product_id: &ProductId) {
    items.retain(|i| &i.product_id != product_id);
}

/// Collapse size-variant lines of one product into a single entry.
///
/// Display aggregation only, never used for storage: the first-added
/// line provides the snapshot fields, quantities are summed, and the
/// size label is cleared since it no longer identifies anything.
pub fn group_by_product(items: &[CartLineItem]) -> Vec<CartLineItem> {
    let mut grouped: Vec<CartLineItem> = Vec::new();
    for item in items {
        if let Some(existing) = grouped.iter_mut().find(|g| g.product_id == item.product_id) {
            existing.quantity += item.quantity;
        } else {
            let mut entry = item.clone();
            entry.selected_size = None;
            grouped.push(entry);
        }
    }
    grouped
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
