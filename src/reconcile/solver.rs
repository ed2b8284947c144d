//! Assurance-total price reconciliation.
//!
//! ## Contract
//!
//! Given line items and a target total, find new whole-number unit prices
//! (quantities untouched) such that:
//!
//! 1. `Σ quantity × unit_price` equals the target within the tolerance
//! 2. every unit price is a whole number
//! 3. every unit price is `>= 0`
//!
//! Proposals breaking any of these are discarded. Among valid proposals the
//! highest [`score`] wins, earlier strategies winning ties.
//!
//! ## Outcomes
//!
//! - `Err(PricingError::InvalidInput)`: the request is unusable
//! - `Ok(ReconcileOutcome::Solved)`: a full, verified solution
//! - `Ok(ReconcileOutcome::Failed)`: nothing verified within the budget;
//!   the caller keeps its current prices
//!
//! ## Example
//!
//! ```
//! use optic_pricing::reconcile::{PriceReconciler, ReconcileRequest, ReconciliationSession};
//! use optic_pricing::types::LineItem;
//! use rust_decimal::Decimal;
//!
//! let reconciler = PriceReconciler::default();
//! let mut session = ReconciliationSession::new();
//!
//! let items = vec![
//!     LineItem::new(1, 1, Decimal::from(100)),
//!     LineItem::new(2, 1, Decimal::from(100)),
//! ];
//! let request = ReconcileRequest::new(items, Decimal::from(225), 2000);
//!
//! let outcome = reconciler.reconcile(&mut session, &request).unwrap();
//! let solution = outcome.into_result().unwrap();
//!
//! assert_eq!(solution.items[0].unit_price, Decimal::from(113));
//! assert_eq!(solution.items[1].unit_price, Decimal::from(112));
//! ```

use std::collections::HashSet;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::ReconcileConfig;
use crate::error::{PricingError, ReconcileFailure, Result};
use crate::reconcile::session::ReconciliationSession;
use crate::reconcile::strategy::{Candidate, Deadline, Strategy};
use crate::types::price::{
    approx_eq, decimal_from_f64, is_multiple_of, is_whole, round_to_unit, ROUND_PRICE_UNIT,
    TOTAL_TOLERANCE,
};
use crate::types::{checked_subtotal, LineItem};

/// Points per price that is a multiple of 100
const ROUND_PRICE_POINTS: u32 = 50;

/// Points when no price carries a fraction
const WHOLE_PRICES_POINTS: u32 = 5;

// ============================================================================
// Request / Outcome
// ============================================================================

/// Items to reconcile against a target total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileRequest {
    pub items: Vec<LineItem>,
    pub target_total: Decimal,
    pub time_budget_ms: u64,
}

impl ReconcileRequest {
    pub fn new(items: Vec<LineItem>, target_total: Decimal, time_budget_ms: u64) -> Self {
        Self {
            items,
            target_total,
            time_budget_ms,
        }
    }

    /// Build a request from a floating point target.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidInput`] for NaN or infinite targets.
    pub fn from_f64(items: Vec<LineItem>, target_total: f64, time_budget_ms: u64) -> Result<Self> {
        let target = decimal_from_f64(target_total).ok_or_else(|| {
            PricingError::invalid_input(format!("target total {} is not a number", target_total))
        })?;
        Ok(Self::new(items, target, time_budget_ms))
    }
}

/// A verified set of reconciled prices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Items with updated unit prices, in request order
    pub items: Vec<LineItem>,

    /// Strategy that produced the prices; `None` when the baseline already
    /// matched the target
    pub strategy: Option<Strategy>,

    /// Ranking score, see [`score`]
    pub score: u32,

    /// Recomputed total
    pub total: Decimal,
}

/// Result of a well-formed reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Solved(Solution),
    Failed(ReconcileFailure),
}

impl ReconcileOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, ReconcileOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            ReconcileOutcome::Solved(solution) => Some(solution),
            ReconcileOutcome::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> std::result::Result<Solution, ReconcileFailure> {
        match self {
            ReconcileOutcome::Solved(solution) => Ok(solution),
            ReconcileOutcome::Failed(failure) => Err(failure),
        }
    }
}

// ============================================================================
// Scoring / verification
// ============================================================================

/// `50 × (prices divisible by 100) + 5 if every price is whole`
pub fn score(prices: &[Decimal]) -> u32 {
    let round = prices
        .iter()
        .filter(|&&price| is_multiple_of(price, ROUND_PRICE_UNIT))
        .count() as u32;
    let whole_bonus = if prices.iter().all(|&price| is_whole(price)) {
        WHOLE_PRICES_POINTS
    } else {
        0
    };
    round * ROUND_PRICE_POINTS + whole_bonus
}

/// Apply `prices` to `items` and check every hard constraint.
///
/// Returns the repriced items and their total when all hold. The tolerance
/// never exceeds [`TOTAL_TOLERANCE`], whatever the caller passes. A total
/// that overflows `Decimal` fails the check.
fn verify(
    items: &[LineItem],
    prices: &[Decimal],
    target: Decimal,
    tolerance: Decimal,
) -> Option<(Vec<LineItem>, Decimal)> {
    if prices.len() != items.len() {
        return None;
    }
    if prices.iter().any(|&price| price < Decimal::ZERO || !is_whole(price)) {
        return None;
    }

    let repriced: Vec<LineItem> = items
        .iter()
        .zip(prices)
        .map(|(item, &price)| LineItem {
            unit_price: price,
            ..item.clone()
        })
        .collect();
    let total = checked_subtotal(&repriced)?;

    approx_eq(total, target, tolerance.min(TOTAL_TOLERANCE)).then_some((repriced, total))
}

// ============================================================================
// PriceReconciler
// ============================================================================

/// Runs the configured strategies against a session's baseline
#[derive(Debug, Clone, Default)]
pub struct PriceReconciler {
    config: ReconcileConfig,
}

impl PriceReconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Build a request using the configured time budget
    pub fn request(&self, items: Vec<LineItem>, target_total: Decimal) -> ReconcileRequest {
        ReconcileRequest::new(items, target_total, self.config.time_budget_ms)
    }

    /// Reconcile without a surrounding session.
    ///
    /// The request's current prices are the baseline.
    pub fn reconcile_once(&self, request: &ReconcileRequest) -> Result<ReconcileOutcome> {
        self.reconcile(&mut ReconciliationSession::new(), request)
    }

    /// Reconcile `request` starting from the session's baseline prices.
    ///
    /// Calling this repeatedly with the same session and target yields the
    /// same outcome, whatever prices the items carry in between.
    pub fn reconcile(
        &self,
        session: &mut ReconciliationSession,
        request: &ReconcileRequest,
    ) -> Result<ReconcileOutcome> {
        validate(request)?;

        let target = request.target_total;
        let tolerance = self.config.tolerance;

        if request.items.is_empty() {
            // Only a zero target gets here
            return Ok(ReconcileOutcome::Solved(Solution {
                items: Vec::new(),
                strategy: None,
                score: score(&[]),
                total: Decimal::ZERO,
            }));
        }

        let baseline_prices = session.baseline_for(&request.items);
        let baseline: Vec<LineItem> = request
            .items
            .iter()
            .zip(&baseline_prices)
            .map(|(item, &price)| LineItem {
                unit_price: price,
                ..item.clone()
            })
            .collect();
        let Some(baseline_total) = checked_subtotal(&baseline) else {
            warn!(items = baseline.len(), "baseline total overflows");
            return Ok(ReconcileOutcome::Failed(ReconcileFailure::NoSolutionFound));
        };
        let difference = round_to_unit(target - baseline_total);

        // Snapshot and baseline total are not charged to the budget
        let deadline = Deadline::start(Duration::from_millis(request.time_budget_ms));

        debug!(
            items = baseline.len(),
            %baseline_total,
            %target,
            %difference,
            "reconciling against target total"
        );

        if difference.abs() < Decimal::ONE {
            return Ok(match verify(&baseline, &baseline_prices, target, tolerance) {
                Some((items, total)) => {
                    info!(%total, "baseline already matches target");
                    ReconcileOutcome::Solved(Solution {
                        items,
                        strategy: None,
                        score: score(&baseline_prices),
                        total,
                    })
                }
                None => {
                    debug!(%baseline_total, %target, "baseline within rounding but not exact");
                    ReconcileOutcome::Failed(ReconcileFailure::NoSolutionFound)
                }
            });
        }

        let mut best: Option<Solution> = None;
        let mut timed_out = false;

        for &strategy in &self.config.strategies {
            if deadline.expired() {
                timed_out = true;
                break;
            }

            let Some(Candidate { prices, .. }) = strategy.propose(&baseline, difference, &deadline) else {
                if deadline.expired() {
                    timed_out = true;
                    break;
                }
                debug!(strategy = strategy.name(), "strategy produced no proposal");
                continue;
            };

            match verify(&baseline, &prices, target, tolerance) {
                Some((items, total)) => {
                    let candidate_score = score(&prices);
                    debug!(strategy = strategy.name(), score = candidate_score, "valid proposal");
                    if best.as_ref().map_or(true, |b| candidate_score > b.score) {
                        best = Some(Solution {
                            items,
                            strategy: Some(strategy),
                            score: candidate_score,
                            total,
                        });
                    }
                }
                None => {
                    debug!(strategy = strategy.name(), "proposal violates constraints");
                }
            }
        }

        let elapsed_ms = deadline.elapsed().as_millis() as u64;

        Ok(match best {
            Some(solution) => {
                info!(
                    strategy = solution.strategy.map(Strategy::name),
                    score = solution.score,
                    total = %solution.total,
                    elapsed_ms,
                    "reconciled prices to target"
                );
                ReconcileOutcome::Solved(solution)
            }
            None if timed_out => {
                warn!(
                    budget_ms = request.time_budget_ms,
                    elapsed_ms,
                    "reconciliation ran out of time"
                );
                ReconcileOutcome::Failed(ReconcileFailure::TimeBudgetExceeded {
                    budget_ms: request.time_budget_ms,
                    elapsed_ms,
                })
            }
            None => {
                debug!(%target, elapsed_ms, "no exact solution");
                ReconcileOutcome::Failed(ReconcileFailure::NoSolutionFound)
            }
        })
    }
}

/// Reject requests no strategy could ever satisfy
fn validate(request: &ReconcileRequest) -> Result<()> {
    if request.target_total < Decimal::ZERO {
        return Err(PricingError::invalid_input(format!(
            "target total {} is negative",
            request.target_total
        )));
    }
    if request.items.is_empty() && !request.target_total.is_zero() {
        return Err(PricingError::invalid_input(format!(
            "target total {} requested for an empty item list",
            request.target_total
        )));
    }

    let mut seen = HashSet::with_capacity(request.items.len());
    for item in &request.items {
        if item.quantity == 0 {
            return Err(PricingError::invalid_input(format!(
                "item {} has quantity 0",
                item.id
            )));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(PricingError::invalid_input(format!(
                "item {} has negative unit price {}",
                item.id, item.unit_price
            )));
        }
        if !seen.insert(item.id) {
            return Err(PricingError::invalid_input(format!(
                "item id {} appears more than once",
                item.id
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
