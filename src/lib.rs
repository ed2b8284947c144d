//! # optic-pricing
//!
//! Pricing core of an optical-store back office.
//!
//! ## Architecture
//!
//! - **Types**: Line items, eyes, prescription readings, decimal helpers
//! - **Markup**: Prescription-strength markup from sphere/cylinder tier tables
//! - **Reconcile**: Redistributes unit prices so a receipt matches an
//!   externally imposed (assurance) total
//! - **Config**: TOML-loadable tier tables and reconciler settings
//!
//! ## Design Principles
//!
//! 1. **Decimal money**: All prices use `rust_decimal`, never `f64`
//! 2. **No hidden state**: Baseline prices live in a caller-owned session
//! 3. **Fail closed**: Reconciliation returns a full verified solution or
//!    nothing
//! 4. **Bounded time**: Every reconciliation runs against a wall-clock budget
//!
//! ## Example
//!
//! ```
//! use optic_pricing::{LineItem, MarkupCalculator, Prescription, EyeReading, Eye};
//! use rust_decimal::Decimal;
//!
//! let calc = MarkupCalculator::default();
//! let rx = Prescription::new(EyeReading::parse("-8.25", "-0.5"), EyeReading::default());
//!
//! let mut items = vec![LineItem::lens(1, 1, Decimal::from(100), Eye::Right)];
//! calc.reprice(&mut items, &rx);
//!
//! assert_eq!(items[0].unit_price, Decimal::from(130));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: LineItem, Eye, EyeReading, Prescription
pub mod types;

/// Error types
pub mod error;

/// Prescription-tiered markup
pub mod markup;

/// Assurance-total price reconciliation
pub mod reconcile;

/// TOML configuration
pub mod config;

/// Subscriber setup for binaries
pub mod logging;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{checked_subtotal, subtotal, Eye, EyeReading, ItemId, LineItem, Prescription};
pub use error::{PricingError, ReconcileFailure, Result};
pub use markup::{markup_percent, MarkupCalculator, MarkupTables, MarkupTier, TierTable};
pub use reconcile::{PriceReconciler, ReconcileOutcome, ReconcileRequest, ReconciliationSession, Solution, Strategy};
pub use config::{PricingConfig, ReconcileConfig};
