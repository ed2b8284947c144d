//! Markup tier tables.
//!
//! ## Semantics
//!
//! A tier covers the half-open magnitude range `[min, max)`. A value sitting
//! exactly on a boundary belongs to the upper tier. The last tier has no
//! `max` and extends to infinity.
//!
//! A validated [`TierTable`] partitions `[0, ∞)` contiguously, so every
//! non-negative magnitude hits exactly one tier.
//!
//! ## Example
//!
//! ```
//! use optic_pricing::markup::TierTable;
//! use rust_decimal::Decimal;
//!
//! let sph = TierTable::default_sphere();
//! assert_eq!(sph.lookup(Decimal::from(4)), Decimal::from(15));
//! assert_eq!(sph.lookup(Decimal::new(399, 2)), Decimal::ZERO);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// One `[min, max)` range and the markup it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTier {
    /// Inclusive lower bound
    pub min: Decimal,

    /// Exclusive upper bound; `None` means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,

    /// Markup in percent, e.g. 15 for +15%
    pub markup_percent: Decimal,
}

impl MarkupTier {
    pub fn new(min: Decimal, max: Option<Decimal>, markup_percent: Decimal) -> Self {
        Self {
            min,
            max,
            markup_percent,
        }
    }

    /// Check whether `magnitude` falls in `[min, max)`
    #[inline]
    pub fn contains(&self, magnitude: Decimal) -> bool {
        magnitude >= self.min && self.max.map_or(true, |max| magnitude < max)
    }
}

/// Scan `tiers` in order and return the markup of the first matching tier.
///
/// Returns zero when nothing matches. Works on any slice, validated or not.
pub fn lookup(magnitude: Decimal, tiers: &[MarkupTier]) -> Decimal {
    tiers
        .iter()
        .find(|tier| tier.contains(magnitude))
        .map_or(Decimal::ZERO, |tier| tier.markup_percent)
}

// ============================================================================
// TierTable
// ============================================================================

/// A validated, contiguous tier table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MarkupTier>", into = "Vec<MarkupTier>")]
pub struct TierTable {
    tiers: Vec<MarkupTier>,
}

impl TierTable {
    /// Build a table, checking that the tiers partition `[0, ∞)`.
    ///
    /// # Errors
    ///
    /// [`PricingError::Config`] when the table is empty, does not start at
    /// 0, has a gap or overlap, has an empty range, has an unbounded tier
    /// before the last position, is bounded at the end, or carries a
    /// negative markup.
    pub fn new(tiers: Vec<MarkupTier>) -> Result<Self> {
        let first = tiers
            .first()
            .ok_or_else(|| PricingError::config("tier table is empty"))?;
        if !first.min.is_zero() {
            return Err(PricingError::config(format!(
                "first tier must start at 0, found {}",
                first.min
            )));
        }

        let last_index = tiers.len() - 1;
        for (i, tier) in tiers.iter().enumerate() {
            if tier.markup_percent < Decimal::ZERO {
                return Err(PricingError::config(format!(
                    "tier {} has negative markup {}",
                    i, tier.markup_percent
                )));
            }
            match tier.max {
                Some(max) if max <= tier.min => {
                    return Err(PricingError::config(format!(
                        "tier {} is empty: [{}, {})",
                        i, tier.min, max
                    )));
                }
                Some(_) if i == last_index => {
                    return Err(PricingError::config("last tier must be unbounded"));
                }
                None if i != last_index => {
                    return Err(PricingError::config(format!(
                        "tier {} is unbounded but not last",
                        i
                    )));
                }
                _ => {}
            }
            if let Some(next) = tiers.get(i + 1) {
                if tier.max != Some(next.min) {
                    return Err(PricingError::config(format!(
                        "tiers {} and {} are not contiguous",
                        i,
                        i + 1
                    )));
                }
            }
        }

        Ok(Self { tiers })
    }

    /// Default sphere tiers: `[0,4)→0%, [4,8)→15%, [8,∞)→30%`
    pub fn default_sphere() -> Self {
        Self::from_breakpoints(4, 8)
    }

    /// Default cylinder tiers: `[0,2)→0%, [2,4)→15%, [4,∞)→30%`
    pub fn default_cylinder() -> Self {
        Self::from_breakpoints(2, 4)
    }

    fn from_breakpoints(low: i64, high: i64) -> Self {
        let (low, high) = (Decimal::from(low), Decimal::from(high));
        Self {
            tiers: vec![
                MarkupTier::new(Decimal::ZERO, Some(low), Decimal::ZERO),
                MarkupTier::new(low, Some(high), Decimal::from(15)),
                MarkupTier::new(high, None, Decimal::from(30)),
            ],
        }
    }

    /// Markup for a non-negative magnitude; zero for negative input
    #[inline]
    pub fn lookup(&self, magnitude: Decimal) -> Decimal {
        lookup(magnitude, &self.tiers)
    }

    pub fn tiers(&self) -> &[MarkupTier] {
        &self.tiers
    }

    /// Highest markup any tier can produce
    pub fn max_markup(&self) -> Decimal {
        self.tiers
            .iter()
            .map(|tier| tier.markup_percent)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<Vec<MarkupTier>> for TierTable {
    type Error = PricingError;

    fn try_from(tiers: Vec<MarkupTier>) -> Result<Self> {
        Self::new(tiers)
    }
}

impl From<TierTable> for Vec<MarkupTier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
