//! The session-owned cart store.

use cellar_kv::KvStore;
use serde::{Deserialize, Serialize};

use crate::cart::line_item::{self, CartLineItem};
use crate::cart::pricing::{CartTotals, PricingConfig, DEFAULT_VAT_RATE};
use crate::cart::wishlist::{self, WishlistItem};
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::{shipping_fee, Currency, Money};

/// Key the cart state is persisted under.
const STATE_KEY: &str = "cart:state";

/// Serialized store state, as written to device-local storage.
///
/// Insertion order of both collections is preserved across the
/// round-trip and is part of the contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartState {
    /// Cart line items, in add order.
    pub items: Vec<CartLineItem>,
    /// Wishlist entries, in add order.
    pub wishlist: Vec<WishlistItem>,
}

/// Immutable copy of the cart lines taken for checkout evaluation.
///
/// A unit count resolved from a snapshot is advisory to these lines,
/// not to the live cart; [`CartSnapshot::matches`] detects that the
/// cart moved on while an evaluation was in flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    /// The lines as they were at snapshot time.
    pub items: Vec<CartLineItem>,
}

impl CartSnapshot {
    /// Check if the snapshot holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check whether the live cart still holds exactly these lines.
    pub fn matches<S: KvStore>(&self, store: &CartStore<S>) -> bool {
        self.items.len() == store.items().len()
            && self
                .items
                .iter()
                .zip(store.items())
                .all(|(a, b)| a.key() == b.key() && a.quantity == b.quantity)
    }
}

/// The cart aggregate for one browsing session.
///
/// Owned explicitly and handed to the presentation layer at startup;
/// mutations go through `&mut self`, so the single-writer discipline is
/// enforced by the borrow checker rather than a lock. Every mutation
/// flushes the full state to the injected store; the flush is
/// fire-and-forget and a failed write only logs a warning, leaving a
/// tolerated last-write-wins window.
pub struct CartStore<S: KvStore> {
    state: CartState,
    currency: Currency,
    storage: S,
}

impl<S: KvStore> CartStore<S> {
    /// Open the store, rehydrating persisted state when present.
    ///
    /// Unreadable or corrupt state rehydrates as an empty cart rather
    /// than an error.
    pub fn open(storage: S) -> Self {
        let state = match storage.get::<CartState>(STATE_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => CartState::default(),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable cart state");
                CartState::default()
            }
        };
        Self {
            state,
            currency: Currency::EUR,
            storage,
        }
    }

    /// Set the currency empty-cart totals are denominated in.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    // --- mutations ---

    /// Add one of the product in the given size.
    ///
    /// Stock limits are the caller's concern: the catalog stock count
    /// is advisory and may be stale, so call sites check
    /// `item_count(&product.id) < product.stock` and surface their own
    /// message before calling this. The store records whatever it is
    /// told.
    pub fn add_item(&mut self, product: &Product, selected_size: Option<&str>) {
        line_item::upsert_quantity(&mut self.state.items, product, selected_size, 1);
        self.flush();
    }

    /// Remove one of the product, any size.
    ///
    /// With several size-variant lines present the first-added line is
    /// decremented; a line at zero quantity is dropped.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        line_item::decrement_first(&mut self.state.items, product_id);
        self.flush();
    }

    /// Remove every line for the product, all sizes and quantities.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        line_item::remove_all(&mut self.state.items, product_id);
        self.flush();
    }

    /// Clear all line items. The wishlist is unaffected.
    pub fn reset_cart(&mut self) {
        self.state.items.clear();
        self.flush();
    }

    /// Add a product to the wishlist; adding twice keeps one entry.
    pub fn add_to_wishlist(&mut self, product: &Product) {
        wishlist::add_once(&mut self.state.wishlist, product);
        self.flush();
    }

    /// Remove a product's wishlist entry, if present.
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) {
        wishlist::remove(&mut self.state.wishlist, product_id);
        self.flush();
    }

    /// Clear the wishlist. Line items are unaffected.
    pub fn clear_wishlist(&mut self) {
        self.state.wishlist.clear();
        self.flush();
    }

    // --- derived queries ---

    /// The cart lines, in add order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    /// The wishlist entries, in add order.
    pub fn wishlist(&self) -> &[WishlistItem] {
        &self.state.wishlist
    }

    /// Check if the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Gross subtotal over the snapshot prices stored on the lines.
    pub fn subtotal(&self) -> Money {
        // A line in a foreign currency cannot contribute to the sum.
        self.state
            .items
            .iter()
            .fold(Money::zero(self.currency), |acc, item| {
                acc.try_add(&item.line_total()).unwrap_or(acc)
            })
    }

    /// Total quantity across all lines.
    pub fn total_items_count(&self) -> i64 {
        self.state.items.iter().map(|i| i.quantity).sum()
    }

    /// Quantity of one product summed across its size lines, 0 if absent.
    pub fn item_count(&self, product_id: &ProductId) -> i64 {
        self.state
            .items
            .iter()
            .filter(|i| &i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Check if any line carries the product, in any size.
    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.state
            .items
            .iter()
            .any(|i| &i.product_id == product_id)
    }

    /// VAT portion embedded in the subtotal at the default German rate.
    pub fn vat_amount(&self) -> Money {
        self.vat_amount_at(DEFAULT_VAT_RATE)
    }

    /// VAT portion embedded in the subtotal at an explicit rate.
    pub fn vat_amount_at(&self, rate: f64) -> Money {
        self.subtotal().vat_portion(rate)
    }

    /// Shipping cost for the current subtotal.
    pub fn shipping_cost(&self, free_threshold: Money, flat_fee: Money) -> Money {
        shipping_fee(self.subtotal(), free_threshold, flat_fee)
    }

    /// Full pricing breakdown for the current cart.
    pub fn totals(&self, config: &PricingConfig) -> CartTotals {
        CartTotals::compute(self.subtotal(), config)
    }

    /// Lines collapsed per product for display, sizes summed.
    pub fn grouped_items(&self) -> Vec<CartLineItem> {
        line_item::group_by_product(&self.state.items)
    }

    /// Check if the wishlist carries the product.
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.state
            .wishlist
            .iter()
            .any(|i| &i.product_id == product_id)
    }

    /// Number of wishlist entries.
    pub fn wishlist_count(&self) -> usize {
        self.state.wishlist.len()
    }

    /// Take an immutable copy of the lines for checkout evaluation.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.state.items.clone(),
        }
    }

    fn flush(&self) {
        if let Err(err) = self.storage.set(STATE_KEY, &self.state) {
            tracing::warn!(error = %err, "cart state flush failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_kv::MemoryStore;

    fn product(id: &str, cents: i64) -> Product {
        let mut p = Product::new(id, format!("Wine {id}"), id, Money::new(cents, Currency::EUR));
        p.stock = 24;
        p
    }

    fn store() -> CartStore<MemoryStore> {
        CartStore::open(MemoryStore::new())
    }

    #[test]
    fn test_open_empty() {
        let store = store();
        assert!(store.is_empty());
        assert_eq!(store.wishlist_count(), 0);
        assert!(store.subtotal().is_zero());
    }

    #[test]
    fn test_add_and_remove_are_monotonic() {
        let p = product("wine-a", 1190);
        let mut store = store();

        for _ in 0..3 {
            store.add_item(&p, Some("standard"));
        }
        assert_eq!(store.item_count(&p.id), 3);

        store.remove_item(&p.id);
        assert_eq!(store.item_count(&p.id), 2);

        store.remove_item(&p.id);
        store.remove_item(&p.id);
        assert_eq!(store.item_count(&p.id), 0);
        assert!(!store.is_in_cart(&p.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_sizes_make_distinct_lines_but_sum_in_count() {
        let p = product("wine-a", 1190);
        let mut store = store();

        store.add_item(&p, Some("standard"));
        store.add_item(&p, Some("magnum"));

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.item_count(&p.id), 2);
        assert_eq!(store.total_items_count(), 2);
    }

    #[test]
    fn test_remove_from_cart_clears_all_sizes() {
        let p = product("wine-a", 1190);
        let mut store = store();

        store.add_item(&p, Some("standard"));
        store.add_item(&p, Some("magnum"));
        store.add_item(&p, Some("magnum"));

        store.remove_from_cart(&p.id);

        assert!(!store.is_in_cart(&p.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_cart_keeps_wishlist() {
        let p = product("wine-a", 1190);
        let mut store = store();

        store.add_item(&p, None);
        store.add_to_wishlist(&p);
        store.reset_cart();

        assert!(store.is_empty());
        assert_eq!(store.wishlist_count(), 1);
    }

    #[test]
    fn test_wishlist_add_is_idempotent() {
        let p = product("wine-a", 1190);
        let mut store = store();

        store.add_to_wishlist(&p);
        store.add_to_wishlist(&p);

        assert_eq!(store.wishlist_count(), 1);
        assert!(store.is_in_wishlist(&p.id));
    }

    #[test]
    fn test_clear_wishlist_keeps_cart() {
        let p = product("wine-a", 1190);
        let mut store = store();

        store.add_item(&p, None);
        store.add_to_wishlist(&p);
        store.clear_wishlist();

        assert_eq!(store.wishlist_count(), 0);
        assert_eq!(store.item_count(&p.id), 1);
    }

    #[test]
    fn test_subtotal_uses_snapshot_prices() {
        let a = product("wine-a", 1190);
        let b = product("wine-b", 2000);
        let mut store = store();

        store.add_item(&a, None);
        store.add_item(&a, None);
        store.add_item(&b, None);

        assert_eq!(store.subtotal().amount_cents, 2 * 1190 + 2000);
    }

    #[test]
    fn test_vat_and_shipping_queries() {
        let p = product("wine-a", 11900);
        let mut store = store();
        store.add_item(&p, None);

        assert_eq!(store.vat_amount().amount_cents, 1900);

        let threshold = Money::new(5000, Currency::EUR);
        let fee = Money::new(1500, Currency::EUR);
        assert!(store.shipping_cost(threshold, fee).is_zero());
    }

    #[test]
    fn test_totals_breakdown() {
        let p = product("wine-a", 2380);
        let mut store = store();
        store.add_item(&p, None);

        let totals = store.totals(&PricingConfig::default());
        assert_eq!(totals.subtotal.amount_cents, 2380);
        assert_eq!(totals.shipping.amount_cents, 495);
        assert_eq!(totals.grand_total.amount_cents, 2875);
    }

    #[test]
    fn test_persistence_round_trip_preserves_order() {
        let storage = MemoryStore::new();
        {
            let mut store = CartStore::open(&storage);
            store.add_item(&product("wine-a", 1190), Some("standard"));
            store.add_item(&product("wine-b", 1490), None);
            store.add_item(&product("wine-a", 1190), Some("magnum"));
            store.add_to_wishlist(&product("wine-c", 990));
        }

        let reopened = CartStore::open(&storage);
        let ids: Vec<_> = reopened
            .items()
            .iter()
            .map(|i| (i.product_id.as_str().to_string(), i.selected_size.clone()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("wine-a".to_string(), Some("standard".to_string())),
                ("wine-b".to_string(), None),
                ("wine-a".to_string(), Some("magnum".to_string())),
            ]
        );
        assert_eq!(reopened.wishlist_count(), 1);
    }

    #[test]
    fn test_corrupt_state_rehydrates_empty() {
        let storage = MemoryStore::new();
        storage.seed_raw("cart:state", &b"{definitely not json"[..]);

        let store = CartStore::open(&storage);
        assert!(store.is_empty());
        assert_eq!(store.wishlist_count(), 0);
    }

    #[test]
    fn test_mutation_after_corrupt_state_overwrites_it() {
        let storage = MemoryStore::new();
        storage.seed_raw("cart:state", &b"garbage"[..]);

        {
            let mut store = CartStore::open(&storage);
            store.add_item(&product("wine-a", 1190), None);
        }

        let reopened = CartStore::open(&storage);
        assert_eq!(reopened.items().len(), 1);
    }

    #[test]
    fn test_snapshot_matches_until_cart_changes() {
        let p = product("wine-a", 1190);
        let mut store = store();
        store.add_item(&p, None);

        let snapshot = store.snapshot();
        assert!(snapshot.matches(&store));

        store.add_item(&p, None);
        assert!(!snapshot.matches(&store));
    }
}
