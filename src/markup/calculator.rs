//! Prescription-driven markup.
//!
//! ## Rule
//!
//! Sphere and cylinder are looked up independently by magnitude. The higher
//! of the two markups applies; they are never added.
//!
//! ## Example
//!
//! ```
//! use optic_pricing::markup::{markup_percent, MarkupTables};
//! use rust_decimal::Decimal;
//!
//! let tables = MarkupTables::default();
//!
//! // sph -9.50 → 30%, cyl -1.00 → 0%  ⇒ 30%
//! let pct = markup_percent(Some(Decimal::new(-95, 1)), Some(Decimal::from(-1)), &tables);
//! assert_eq!(pct, Decimal::from(30));
//!
//! assert_eq!(markup_percent(None, None, &tables), Decimal::ZERO);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::markup::TierTable;
use crate::types::{EyeReading, LineItem, Prescription};

/// Sphere and cylinder tier tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTables {
    #[serde(default = "TierTable::default_sphere")]
    pub sph: TierTable,

    #[serde(default = "TierTable::default_cylinder")]
    pub cyl: TierTable,
}

impl Default for MarkupTables {
    fn default() -> Self {
        Self {
            sph: TierTable::default_sphere(),
            cyl: TierTable::default_cylinder(),
        }
    }
}

/// Markup percentage for a sphere/cylinder pair.
///
/// Missing values contribute zero. Never fails.
pub fn markup_percent(sph: Option<Decimal>, cyl: Option<Decimal>, tables: &MarkupTables) -> Decimal {
    let sph_markup = sph.map_or(Decimal::ZERO, |v| tables.sph.lookup(v.abs()));
    let cyl_markup = cyl.map_or(Decimal::ZERO, |v| tables.cyl.lookup(v.abs()));
    sph_markup.max(cyl_markup)
}

/// `base_price × (1 + percent / 100)`
///
/// # Example
///
/// ```
/// use optic_pricing::markup::apply_markup;
/// use rust_decimal::Decimal;
///
/// assert_eq!(apply_markup(Decimal::from(200), Decimal::from(15)), Decimal::from(230));
/// ```
pub fn apply_markup(base_price: Decimal, percent: Decimal) -> Decimal {
    base_price + base_price * percent / Decimal::ONE_HUNDRED
}

// ============================================================================
// MarkupCalculator
// ============================================================================

/// Owns a pair of tier tables and re-prices linked lens items.
#[derive(Debug, Clone, Default)]
pub struct MarkupCalculator {
    tables: MarkupTables,
}

impl MarkupCalculator {
    pub fn new(tables: MarkupTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &MarkupTables {
        &self.tables
    }

    /// Markup for one eye's reading
    pub fn markup_for(&self, reading: &EyeReading) -> Decimal {
        markup_percent(reading.sph, reading.cyl, &self.tables)
    }

    /// Re-apply markup to every item after a prescription or link change.
    ///
    /// - Linked items: `unit_price` is recomputed from `base_price` and the
    ///   linked eye's markup.
    /// - Unlinked items still carrying a markup are reset to `base_price`.
    /// - Other unlinked items are left alone.
    ///
    /// # Returns
    ///
    /// The number of items whose unit price changed
    pub fn reprice(&self, items: &mut [LineItem], prescription: &Prescription) -> usize {
        let mut changed = 0;

        for item in items.iter_mut() {
            let previous = item.unit_price;
            match item.linked_eye {
                Some(eye) => {
                    let percent = self.markup_for(prescription.eye(eye));
                    item.applied_markup = percent;
                    item.unit_price = apply_markup(item.base_price, percent);
                }
                None if !item.applied_markup.is_zero() => item.unlink(),
                None => {}
            }
            if item.unit_price != previous {
                changed += 1;
            }
        }

        debug!(items = items.len(), changed, "repriced line items");
        changed
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Eye;

    fn d(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    #[test]
    fn test_markup_none_none() {
        assert_eq!(markup_percent(None, None, &MarkupTables::default()), Decimal::ZERO);
    }

    #[test]
    fn test_markup_sphere_boundary_belongs_to_upper_tier() {
        let tables = MarkupTables::default();
        assert_eq!(markup_percent(Some(d(40, 1)), None, &tables), Decimal::from(15));
        assert_eq!(markup_percent(Some(d(-40, 1)), None, &tables), Decimal::from(15));
    }

    #[test]
    fn test_markup_negative_sphere_uses_magnitude() {
        let tables = MarkupTables::default();
        assert_eq!(markup_percent(Some(d(-95, 1)), None, &tables), Decimal::from(30));
    }

    #[test]
    fn test_markup_takes_max_not_sum() {
        let tables = MarkupTables::default();
        // sph 5 → 15%, cyl 2.5 → 15%
        assert_eq!(
            markup_percent(Some(Decimal::from(5)), Some(d(25, 1)), &tables),
            Decimal::from(15)
        );
        // sph 1 → 0%, cyl -4.25 → 30%
        assert_eq!(
            markup_percent(Some(Decimal::ONE), Some(d(-425, 2)), &tables),
            Decimal::from(30)
        );
    }

    #[test]
    fn test_markup_cyl_only() {
        let tables = MarkupTables::default();
        assert_eq!(markup_percent(None, Some(Decimal::from(2)), &tables), Decimal::from(15));
    }

    #[test]
    fn test_apply_markup() {
        assert_eq!(apply_markup(Decimal::from(100), Decimal::ZERO), Decimal::from(100));
        assert_eq!(apply_markup(Decimal::from(100), Decimal::from(30)), Decimal::from(130));
        assert_eq!(apply_markup(d(4999, 2), Decimal::from(15)), d(574885, 4));
    }

    #[test]
    fn test_reprice_linked_items() {
        let calc = MarkupCalculator::default();
        let mut rx = Prescription::default();
        rx.right = EyeReading::new(Some(d(-45, 1)), None);
        rx.left = EyeReading::new(Some(Decimal::ONE), Some(d(-5, 0)));

        let mut items = vec![
            LineItem::lens(1, 1, Decimal::from(200), Eye::Right),
            LineItem::lens(2, 1, Decimal::from(200), Eye::Left),
            LineItem::new(3, 1, Decimal::from(50)),
        ];

        let changed = calc.reprice(&mut items, &rx);

        assert_eq!(changed, 2);
        assert_eq!(items[0].applied_markup, Decimal::from(15));
        assert_eq!(items[0].unit_price, Decimal::from(230));
        assert_eq!(items[1].applied_markup, Decimal::from(30));
        assert_eq!(items[1].unit_price, Decimal::from(260));
        assert_eq!(items[2].unit_price, Decimal::from(50));
    }

    #[test]
    fn test_reprice_resets_unlinked_item() {
        let calc = MarkupCalculator::default();
        let mut rx = Prescription::default();
        rx.right = EyeReading::new(Some(Decimal::from(9)), None);

        let mut items = vec![LineItem::lens(1, 1, Decimal::from(100), Eye::Right)];
        calc.reprice(&mut items, &rx);
        assert_eq!(items[0].unit_price, Decimal::from(130));

        // Link dropped without calling unlink(): reprice cleans it up
        items[0].linked_eye = None;
        let changed = calc.reprice(&mut items, &rx);

        assert_eq!(changed, 1);
        assert_eq!(items[0].applied_markup, Decimal::ZERO);
        assert_eq!(items[0].unit_price, Decimal::from(100));
    }

    #[test]
    fn test_reprice_is_stable() {
        let calc = MarkupCalculator::default();
        let rx = Prescription::new(
            EyeReading::new(Some(Decimal::from(6)), None),
            EyeReading::default(),
        );
        let mut items = vec![LineItem::lens(1, 2, Decimal::from(100), Eye::Right)];

        assert_eq!(calc.reprice(&mut items, &rx), 1);
        assert_eq!(calc.reprice(&mut items, &rx), 0);
        assert_eq!(items[0].unit_price, Decimal::from(115));
    }
}
