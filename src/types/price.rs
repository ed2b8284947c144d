//! Decimal money and diopter utilities.
//!
//! ## Overview
//!
//! Every price, total and prescription value in optic-pricing is a
//! [`rust_decimal::Decimal`]. Binary floating point is only accepted at the
//! edges (see [`decimal_from_f64`]) and converted immediately, so sums of
//! line totals compare exactly against a target total.
//!
//! ## Tolerance
//!
//! Currency values may carry two decimals. Totals are compared with a
//! tolerance of one cent, [`TOTAL_TOLERANCE`].
//!
//! ## Examples
//!
//! ```
//! use optic_pricing::types::price::{parse_decimal, format_money, is_whole};
//!
//! let price = parse_decimal("112,50").unwrap();
//! assert_eq!(format_money(price), "112.50");
//! assert!(!is_whole(price));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Tolerance used when comparing a computed total against a target: 0.01
pub const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Divisor a price must be a multiple of to be considered "round"
pub const ROUND_PRICE_UNIT: u32 = 100;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a user-entered decimal string.
///
/// Accepts surrounding whitespace, a leading `+` and a comma as decimal
/// separator (prescription forms are often filled in with `-2,25`).
///
/// # Returns
///
/// * `Some(Decimal)` - The parsed value
/// * `None` - If the string is empty or unparseable
///
/// # Example
///
/// ```
/// use optic_pricing::types::price::parse_decimal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal(" -2,25 "), Some(Decimal::new(-225, 2)));
/// assert_eq!(parse_decimal("+4"), Some(Decimal::from(4)));
/// assert_eq!(parse_decimal("abc"), None);
/// ```
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned.is_empty() {
        return None;
    }
    Decimal::from_str(&unsigned.replace(',', ".")).ok()
}

/// Convert an `f64` to a Decimal
///
/// Returns `None` for NaN and infinities.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Round to the nearest whole unit, halves away from zero.
///
/// # Example
///
/// ```
/// use optic_pricing::types::price::round_to_unit;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_unit(Decimal::new(245, 1)), Decimal::from(25));
/// assert_eq!(round_to_unit(Decimal::new(-245, 1)), Decimal::from(-25));
/// assert_eq!(round_to_unit(Decimal::new(244, 1)), Decimal::from(24));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

// ============================================================================
// Predicates
// ============================================================================

/// Check whether a value has no fractional part
#[inline]
pub fn is_whole(value: Decimal) -> bool {
    value.fract().is_zero()
}

/// Check whether a value is a whole multiple of `unit`
///
/// Zero counts as a multiple of every unit.
pub fn is_multiple_of(value: Decimal, unit: u32) -> bool {
    if unit == 0 {
        return false;
    }
    is_whole(value) && (value % Decimal::from(unit)).is_zero()
}

/// Compare two values with a tolerance
///
/// # Returns
///
/// `true` if |a - b| <= tolerance
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

// ============================================================================
// Formatting
// ============================================================================

/// Format a money value with exactly two decimals
///
/// # Example
///
/// ```
/// use optic_pricing::types::price::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::from(113)), "113.00");
/// ```
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Format a percentage with trailing zeros trimmed, e.g. `15%`
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================
