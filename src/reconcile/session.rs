//! Baseline price snapshots.
//!
//! Repeated "auto-adjust" clicks inside one edit dialog must all start from
//! the prices the dialog opened with, not from the previous adjustment.
//! A [`ReconciliationSession`] holds that snapshot. It is owned by the
//! caller, one per dialog; two reconciliations never share one.
//!
//! The snapshot is recaptured when the number of items changes or when an
//! item id is not part of it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::types::{ItemId, LineItem};

/// Baseline unit prices for one editing session
#[derive(Debug, Clone, Default)]
pub struct ReconciliationSession {
    /// Item id → unit price at capture time
    baseline: HashMap<ItemId, Decimal>,

    /// Number of items at capture time
    item_count: usize,

    /// Whether a snapshot exists
    captured: bool,

    /// Number of captures since the last reset
    captures: u32,
}

impl ReconciliationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline unit prices for `items`, in item order.
    ///
    /// Captures a fresh snapshot first if none exists or it no longer fits
    /// the item list.
    pub fn baseline_for(&mut self, items: &[LineItem]) -> Vec<Decimal> {
        if self.is_stale(items) {
            self.capture(items);
        }
        items
            .iter()
            .map(|item| self.baseline.get(&item.id).copied().unwrap_or(item.unit_price))
            .collect()
    }

    fn is_stale(&self, items: &[LineItem]) -> bool {
        !self.captured
            || self.item_count != items.len()
            || items.iter().any(|item| !self.baseline.contains_key(&item.id))
    }

    fn capture(&mut self, items: &[LineItem]) {
        self.baseline = items.iter().map(|item| (item.id, item.unit_price)).collect();
        self.item_count = items.len();
        self.captured = true;
        self.captures += 1;
        debug!(items = self.item_count, captures = self.captures, "captured baseline prices");
    }

    /// Drop the snapshot and the capture count; the next reconciliation
    /// recaptures
    pub fn reset(&mut self) {
        self.baseline.clear();
        self.item_count = 0;
        self.captured = false;
        self.captures = 0;
    }

    /// Check whether a snapshot exists
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Baseline price for one item
    pub fn baseline_price(&self, id: ItemId) -> Option<Decimal> {
        self.baseline.get(&id).copied()
    }

    /// Number of snapshots taken since creation or the last [`reset`](Self::reset)
    pub fn captures(&self) -> u32 {
        self.captures
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
