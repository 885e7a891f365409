//! Checkout module.
//!
//! Contains the bundle-aware unit counting and the eligibility gate
//! that decides between direct checkout and a whole-case warning.

mod gate;
mod units;

pub use gate::{
    evaluate_checkout_eligibility, CheckoutAssessment, CheckoutGate, GateState, CASE_SIZE,
};
pub use units::resolve_unit_count;
