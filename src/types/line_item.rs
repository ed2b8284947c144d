//! Line items of a receipt or invoice.
//!
//! ## Prices
//!
//! A line item keeps two prices:
//!
//! - `base_price`: the catalogue price before any prescription markup
//! - `unit_price`: the price actually charged, after markup and after any
//!   reconciliation against an assurance total
//!
//! The line total is always derived, never stored, so it cannot drift from
//! `quantity × unit_price`.

use rust_decimal::Decimal;

use crate::types::prescription::Eye;

/// Line item identifier (assigned by the hosting application)
pub type ItemId = u64;

/// A priced line item.
///
/// ## Example
///
/// ```
/// use optic_pricing::types::LineItem;
/// use rust_decimal::Decimal;
///
/// // Two lenses at 100.00 each
/// let item = LineItem::new(1, 2, Decimal::from(100));
/// assert_eq!(item.line_total(), Decimal::from(200));
/// assert!(item.linked_eye.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Identifier, unique within one list
    pub id: ItemId,

    /// Number of units, must be >= 1
    pub quantity: u32,

    /// Price per unit actually charged
    pub unit_price: Decimal,

    /// Price per unit before prescription markup
    pub base_price: Decimal,

    /// Eye whose prescription drives this item's markup, if any
    pub linked_eye: Option<Eye>,

    /// Markup percentage currently baked into `unit_price`
    pub applied_markup: Decimal,
}

impl LineItem {
    /// Create an unlinked line item whose base and unit price are equal
    pub fn new(id: ItemId, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            id,
            quantity,
            unit_price,
            base_price: unit_price,
            linked_eye: None,
            applied_markup: Decimal::ZERO,
        }
    }

    /// Create a lens line item linked to one eye's prescription
    pub fn lens(id: ItemId, quantity: u32, base_price: Decimal, eye: Eye) -> Self {
        Self {
            linked_eye: Some(eye),
            ..Self::new(id, quantity, base_price)
        }
    }

    /// `quantity × unit_price`
    ///
    /// Panics if the product does not fit a `Decimal`; see
    /// [`checked_line_total`](Self::checked_line_total).
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// `quantity × unit_price`, or `None` on overflow
    pub fn checked_line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }

    /// Link the item to an eye.
    ///
    /// The price is not touched; callers re-run markup afterwards.
    pub fn link(&mut self, eye: Eye) {
        self.linked_eye = Some(eye);
    }

    /// Unlink the item and drop any applied markup
    pub fn unlink(&mut self) {
        self.linked_eye = None;
        self.applied_markup = Decimal::ZERO;
        self.unit_price = self.base_price;
    }

    /// Check whether the item is linked to an eye
    pub fn is_linked(&self) -> bool {
        self.linked_eye.is_some()
    }
}

/// Sum of all line totals
///
/// # Example
///
/// ```
/// use optic_pricing::types::{subtotal, LineItem};
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     LineItem::new(1, 1, Decimal::from(100)),
///     LineItem::new(2, 3, Decimal::from(20)),
/// ];
/// assert_eq!(subtotal(&items), Decimal::from(160));
/// ```
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Sum of all line totals, or `None` if any product or the sum overflows
pub fn checked_subtotal(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.checked_line_total()?))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_new() {
        let item = LineItem::new(7, 2, Decimal::new(4950, 2));

        assert_eq!(item.id, 7);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, Decimal::new(4950, 2));
        assert_eq!(item.base_price, item.unit_price);
        assert_eq!(item.applied_markup, Decimal::ZERO);
        assert_eq!(item.line_total(), Decimal::from(99));
        assert!(!item.is_linked());
    }

    #[test]
    fn test_lens_is_linked() {
        let item = LineItem::lens(1, 1, Decimal::from(80), Eye::Left);
        assert_eq!(item.linked_eye, Some(Eye::Left));
    }

    #[test]
    fn test_unlink_resets_markup() {
        let mut item = LineItem::lens(1, 1, Decimal::from(100), Eye::Right);
        item.applied_markup = Decimal::from(15);
        item.unit_price = Decimal::from(115);

        item.unlink();

        assert!(!item.is_linked());
        assert_eq!(item.applied_markup, Decimal::ZERO);
        assert_eq!(item.unit_price, Decimal::from(100));
    }

    #[test]
    fn test_subtotal_empty() {
        assert_eq!(subtotal(&[]), Decimal::ZERO);
        assert_eq!(checked_subtotal(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_checked_subtotal_overflow() {
        let items = vec![
            LineItem::new(1, 1, Decimal::from(100)),
            LineItem::new(2, 3, Decimal::from(20)),
        ];
        assert_eq!(checked_subtotal(&items), Some(Decimal::from(160)));

        let huge = LineItem::new(1, 2, Decimal::MAX);
        assert_eq!(huge.checked_line_total(), None);

        let pair = vec![LineItem::new(1, 1, Decimal::MAX), LineItem::new(2, 1, Decimal::MAX)];
        assert_eq!(checked_subtotal(&pair), None);
    }
}
