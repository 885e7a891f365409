//! Cart pricing configuration and totals breakdown.

use serde::{Deserialize, Serialize};

use crate::money::{shipping_fee, Currency, Money};

/// Standard German VAT rate on wine, embedded in gross prices.
pub const DEFAULT_VAT_RATE: f64 = 0.19;

/// Jurisdiction pricing parameters for the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    /// VAT rate already contained in gross prices.
    pub vat_rate: f64,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Money,
    /// Flat shipping fee below the threshold.
    pub flat_shipping_fee: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            free_shipping_threshold: Money::new(5_000, Currency::EUR),
            flat_shipping_fee: Money::new(495, Currency::EUR),
        }
    }
}

/// Complete pricing breakdown for a cart.
///
/// VAT is informational: it is already contained in the gross subtotal,
/// so the amount due is subtotal plus shipping, never subtotal plus VAT.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    /// Gross subtotal over all lines.
    pub subtotal: Money,
    /// VAT portion embedded in the subtotal.
    pub vat: Money,
    /// Shipping cost at the current subtotal.
    pub shipping: Money,
    /// Amount due: subtotal plus shipping.
    pub grand_total: Money,
}

impl CartTotals {
    /// Build the breakdown for a gross subtotal.
    pub fn compute(subtotal: Money, config: &PricingConfig) -> Self {
        let vat = subtotal.vat_portion(config.vat_rate);
        let shipping = shipping_fee(
            subtotal,
            config.free_shipping_threshold,
            config.flat_shipping_fee,
        );
        let grand_total = subtotal.add(&shipping);
        Self {
            subtotal,
            vat,
            shipping,
            grand_total,
        }
    }

    /// Net subtotal after stripping the embedded VAT.
    pub fn net(&self) -> Money {
        self.subtotal.subtract(&self.vat)
    }

    /// Check if the order ships free.
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}
