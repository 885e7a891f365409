//! Checkout eligibility gate.
//!
//! Wine leaves the warehouse in whole cases; a cart whose resolved
//! bottle count is off the case grid gets a warning instead of a hard
//! stop. The gate is a small state machine over one checkout attempt.

use serde::{Deserialize, Serialize};

use crate::cart::CartSnapshot;
use crate::catalog::CompositionSource;
use crate::checkout::units::resolve_unit_count;
use crate::error::CommerceError;

/// Bottles per shipping case.
pub const CASE_SIZE: i64 = 6;

/// States of the checkout gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GateState {
    /// Waiting for the user to initiate checkout.
    #[default]
    Idle,
    /// Resolving the unit count for the evaluated snapshot.
    Evaluating,
    /// The cart may proceed straight to checkout.
    DirectProceed,
    /// The cart is off the case grid; the user decides.
    WarnUser,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Idle => "idle",
            GateState::Evaluating => "evaluating",
            GateState::DirectProceed => "direct_proceed",
            GateState::WarnUser => "warn_user",
        }
    }
}

/// Outcome of a checkout eligibility evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutAssessment {
    /// Whether the resolved unit count sits on the case grid.
    pub eligible: bool,
    /// Units resolved for the evaluated snapshot.
    pub resolved_unit_count: i64,
}

impl CheckoutAssessment {
    /// Units missing to reach the next full case, 0 when eligible.
    pub fn units_to_next_case(&self) -> i64 {
        (CASE_SIZE - self.resolved_unit_count % CASE_SIZE) % CASE_SIZE
    }
}

/// The checkout gate for a single checkout attempt.
///
/// Holds no state beyond the attempt itself: construct one when the
/// user initiates checkout and drop it once a navigation decision is
/// made. The resolved unit count belongs to the snapshot passed to
/// [`CheckoutGate::evaluate`], not to the live cart; callers use
/// [`CartSnapshot::matches`] before acting on a result that has been
/// in flight for a while.
#[derive(Debug, Default)]
pub struct CheckoutGate {
    state: GateState,
    resolved_unit_count: Option<i64>,
}

impl CheckoutGate {
    /// Create a gate in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Unit count from the last evaluation, if one has run.
    pub fn resolved_unit_count(&self) -> Option<i64> {
        self.resolved_unit_count
    }

    /// Check if the gate has reached a proceed decision.
    pub fn can_proceed(&self) -> bool {
        self.state == GateState::DirectProceed
    }

    /// Evaluate a cart snapshot against the whole-case rule.
    ///
    /// The gate's only suspend point. Lands in `DirectProceed` when the
    /// resolved unit count is a multiple of [`CASE_SIZE`] (an empty
    /// snapshot counts zero units and passes trivially), and in
    /// `WarnUser` otherwise. Only legal from `Idle`.
    pub async fn evaluate<S>(
        &mut self,
        snapshot: &CartSnapshot,
        source: &S,
    ) -> Result<GateState, CommerceError>
    where
        S: CompositionSource + ?Sized,
    {
        if self.state != GateState::Idle {
            return Err(self.invalid_transition(GateState::Evaluating));
        }
        self.state = GateState::Evaluating;

        let units = resolve_unit_count(&snapshot.items, source).await;
        self.resolved_unit_count = Some(units);
        self.state = if units % CASE_SIZE == 0 {
            GateState::DirectProceed
        } else {
            GateState::WarnUser
        };
        Ok(self.state)
    }

    /// Accept the warning and proceed anyway, without re-evaluating.
    pub fn force_proceed(&mut self) -> Result<(), CommerceError> {
        if self.state != GateState::WarnUser {
            return Err(self.invalid_transition(GateState::DirectProceed));
        }
        self.state = GateState::DirectProceed;
        Ok(())
    }

    /// Dismiss the warning and return to shopping; the cart is untouched.
    pub fn continue_shopping(&mut self) -> Result<(), CommerceError> {
        if self.state != GateState::WarnUser {
            return Err(self.invalid_transition(GateState::Idle));
        }
        self.state = GateState::Idle;
        self.resolved_unit_count = None;
        Ok(())
    }

    fn invalid_transition(&self, to: GateState) -> CommerceError {
        CommerceError::InvalidGateTransition {
            from: self.state.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}

/// One-shot eligibility check over a cart snapshot.
///
/// The entry point for callers that only need the answer, not the
/// interactive warn/force-proceed flow.
pub async fn evaluate_checkout_eligibility<S>(
    snapshot: &CartSnapshot,
    source: &S,
) -> CheckoutAssessment
where
    S: CompositionSource + ?Sized,
{
    let resolved_unit_count = resolve_unit_count(&snapshot.items, source).await;
    CheckoutAssessment {
        eligible: resolved_unit_count % CASE_SIZE == 0,
        resolved_unit_count,
    }
}
