//! Bundle-aware unit counting.

use crate::cart::CartLineItem;
use crate::catalog::CompositionSource;

/// Resolve the total consumable-unit count for a set of cart lines.
///
/// Plain products and ids the catalog does not know count one unit per
/// quantity; bundles count the sum of their component units per
/// quantity. A failed lookup downgrades that line to one unit per
/// quantity instead of aborting the computation, so a catalog outage
/// cannot block a checkout eligibility assessment. Lookups for the
/// lines run concurrently; only the sum is observable.
pub async fn resolve_unit_count<S>(items: &[CartLineItem], source: &S) -> i64
where
    S: CompositionSource + ?Sized,
{
    let lookups = items.iter().map(|item| async move {
        let units_each = match source.composition(&item.product_id).await {
            Ok(Some(composition)) => composition.units_each(),
            Ok(None) => 1,
            Err(err) => {
                tracing::warn!(
                    product_id = %item.product_id,
                    error = %err,
                    "composition lookup failed, counting one unit per quantity"
                );
                1
            }
        };
        sanitized_quantity(item) * units_each
    });
    futures::future::join_all(lookups).await.into_iter().sum()
}

/// A quantity below 1 violates the line-item invariant. Debug builds
/// fail fast; release builds count the line as zero units.
fn sanitized_quantity(item: &CartLineItem) -> i64 {
    debug_assert!(
        item.quantity >= 1,
        "cart line {} with non-positive quantity",
        item.product_id
    );
    item.quantity.max(0)
}
