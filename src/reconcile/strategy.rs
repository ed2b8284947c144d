//! Price adjustment strategies.
//!
//! Every strategy answers the same question: given the baseline items and an
//! integer `difference` between the target total and the baseline total,
//! which unit prices should the items get? A strategy only proposes; the
//! solver verifies and ranks proposals, so a new heuristic is a new
//! [`Strategy`] variant and nothing else.
//!
//! Strategies poll the [`Deadline`] after every item-level step and give up
//! (`None`) once it has passed.

use std::time::{Duration, Instant};

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::LineItem;

// ============================================================================
// Deadline
// ============================================================================

/// Wall-clock budget for one reconciliation
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock now
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// Check whether the budget is used up. A zero budget is always expired.
    #[inline]
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// Available adjustment heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Spread the difference evenly over unit prices, remainder to the
    /// first items in list order. Decreases clamp at zero and the
    /// shortfall is not moved to other items.
    EqualDistribution,

    /// Spread the difference so that `Σ quantity × Δprice` hits it exactly,
    /// taking decreases from the most expensive items first.
    QuantityWeighted,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::EqualDistribution => "equal_distribution",
            Strategy::QuantityWeighted => "quantity_weighted",
        }
    }

    /// Propose new unit prices, one per item, in item order.
    ///
    /// `difference` must be a whole number. Returns `None` when the strategy
    /// cannot produce a proposal or the deadline passed.
    pub fn propose(
        self,
        items: &[LineItem],
        difference: Decimal,
        deadline: &Deadline,
    ) -> Option<Candidate> {
        if items.is_empty() {
            return None;
        }
        let prices = match self {
            Strategy::EqualDistribution => equal_distribution(items, difference, deadline)?,
            Strategy::QuantityWeighted => quantity_weighted(items, difference, deadline)?,
        };
        Some(Candidate {
            strategy: self,
            prices,
        })
    }
}

/// Unit prices proposed by one strategy, unverified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub strategy: Strategy,
    pub prices: Vec<Decimal>,
}

// ============================================================================
// Equal distribution
// ============================================================================

fn equal_distribution(items: &[LineItem], difference: Decimal, deadline: &Deadline) -> Option<Vec<Decimal>> {
    let increase = difference > Decimal::ZERO;
    let magnitude = difference.abs();
    let count = Decimal::from(items.len());
    let step = (magnitude / count).floor();
    let mut remainder = (magnitude - step * count).to_usize()?;

    let mut prices = Vec::with_capacity(items.len());
    for item in items {
        prices.push(shift(item.unit_price, step, increase)?);
        if deadline.expired() {
            return None;
        }
    }

    for price in prices.iter_mut() {
        if remainder == 0 {
            break;
        }
        if !increase && price.is_zero() {
            continue;
        }
        *price = shift(*price, Decimal::ONE, increase)?;
        remainder -= 1;
        if deadline.expired() {
            return None;
        }
    }

    Some(prices)
}

/// Move `price` by `amount`; `None` when an increase overflows
fn shift(price: Decimal, amount: Decimal, increase: bool) -> Option<Decimal> {
    if increase {
        price.checked_add(amount)
    } else {
        Some(price.checked_sub(amount)?.max(Decimal::ZERO))
    }
}

// ============================================================================
// Quantity weighted
// ============================================================================

fn quantity_weighted(items: &[LineItem], difference: Decimal, deadline: &Deadline) -> Option<Vec<Decimal>> {
    let increase = difference > Decimal::ZERO;
    let mut outstanding = difference.abs();
    let total_quantity: Decimal = items.iter().map(|item| Decimal::from(item.quantity)).sum();
    if total_quantity.is_zero() {
        return None;
    }

    // Whole units each price can still move by
    let capacity = |price: Decimal| -> Option<Decimal> {
        if increase {
            None
        } else {
            Some(price.max(Decimal::ZERO).floor())
        }
    };

    let mut prices: Vec<Decimal> = items.iter().map(|item| item.unit_price).collect();

    // Even per-unit step first
    let step = (outstanding / total_quantity).floor();
    for (price, item) in prices.iter_mut().zip(items) {
        let units = capacity(*price).map_or(step, |cap| cap.min(step));
        *price = shift(*price, units, increase)?;
        outstanding = outstanding.checked_sub(units.checked_mul(Decimal::from(item.quantity))?)?;
        if deadline.expired() {
            return None;
        }
    }

    // Greedy on the rest: expensive items first when decreasing, large
    // quantities first when increasing; list order breaks ties.
    let mut order: Vec<usize> = (0..items.len()).collect();
    if increase {
        order.sort_by(|&a, &b| items[b].quantity.cmp(&items[a].quantity));
    } else {
        order.sort_by(|&a, &b| prices[b].cmp(&prices[a]));
    }

    for index in order {
        if outstanding.is_zero() {
            break;
        }
        let quantity = Decimal::from(items[index].quantity);
        let wanted = (outstanding / quantity).floor();
        let units = capacity(prices[index]).map_or(wanted, |cap| cap.min(wanted));
        prices[index] = shift(prices[index], units, increase)?;
        outstanding = outstanding.checked_sub(units.checked_mul(quantity)?)?;
        if deadline.expired() {
            return None;
        }
    }

    if outstanding.is_zero() {
        Some(prices)
    } else {
        None
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
