//! Prescription markup for lens line items.
//!
//! ## Components
//!
//! - [`MarkupTier`] / [`TierTable`]: `[min, max)` magnitude ranges and their markup
//! - [`markup_percent`]: the higher of the sphere and cylinder markups
//! - [`MarkupCalculator`]: re-prices linked lens items from a prescription
//!
//! ## Defaults
//!
//! | Attribute | 0%       | 15%      | 30%    |
//! |-----------|----------|----------|--------|
//! | Sphere    | `[0, 4)` | `[4, 8)` | `[8, ∞)` |
//! | Cylinder  | `[0, 2)` | `[2, 4)` | `[4, ∞)` |

pub mod tier;
pub mod calculator;

pub use tier::{lookup, MarkupTier, TierTable};
pub use calculator::{apply_markup, markup_percent, MarkupCalculator, MarkupTables};
