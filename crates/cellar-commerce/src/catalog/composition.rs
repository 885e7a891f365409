//! Bundle composition and the catalog lookup seam.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;

/// One component of a bundle and how many drinkable units it adds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleComponent {
    /// Product the bundle draws from.
    pub component_id: ProductId,
    /// Units of that product contained in one bundle.
    pub units_per_bundle: i64,
}

impl BundleComponent {
    pub fn new(component_id: impl Into<ProductId>, units_per_bundle: i64) -> Self {
        Self {
            component_id: component_id.into(),
            units_per_bundle,
        }
    }
}

/// How a catalog entry breaks down into consumable units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Composition {
    /// A plain product: one unit per purchased quantity.
    Single,
    /// A bundle of component products.
    Bundle {
        /// The bundle's fixed component list.
        components: Vec<BundleComponent>,
    },
}

impl Composition {
    /// Build a bundle composition from its components.
    pub fn bundle(components: Vec<BundleComponent>) -> Self {
        Composition::Bundle { components }
    }

    /// Units contributed by one purchasable of this entry.
    pub fn units_each(&self) -> i64 {
        match self {
            Composition::Single => 1,
            Composition::Bundle { components } => {
                components.iter().map(|c| c.units_per_bundle).sum()
            }
        }
    }
}

/// Asynchronous catalog lookup for product compositions.
///
/// `Ok(None)` means the catalog has no entry for the id; how to treat
/// an unknown product is the caller's decision. Implementations back
/// onto the CMS in production and onto [`InMemoryCatalog`] in tests.
#[async_trait]
pub trait CompositionSource: Send + Sync {
    /// Resolve the composition of a catalog entry.
    async fn composition(&self, id: &ProductId) -> Result<Option<Composition>, CommerceError>;
}

/// Catalog backed by a map, for tests and offline demos.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: HashMap<ProductId, Composition>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry's composition.
    pub fn insert(&mut self, id: impl Into<ProductId>, composition: Composition) {
        self.entries.insert(id.into(), composition);
    }
}

#[async_trait]
impl CompositionSource for InMemoryCatalog {
    async fn composition(&self, id: &ProductId) -> Result<Option<Composition>, CommerceError> {
        Ok(self.entries.get(id).cloned())
    }
}
