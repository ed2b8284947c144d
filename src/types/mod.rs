//! Core data types for optic-pricing
//!
//! ## Types
//!
//! - [`LineItem`]: A priced line on a receipt or invoice
//! - [`Eye`]: Right or Left
//! - [`EyeReading`]: Sphere/cylinder for one eye
//! - [`Prescription`]: Readings for both eyes
//!
//! ## Decimal Arithmetic
//!
//! All prices, totals and diopters are `rust_decimal::Decimal`.
//! See [`price`] for parsing, rounding and comparison helpers.

mod line_item;
mod prescription;
pub mod price;

// Re-export all types at module level
pub use line_item::{checked_subtotal, subtotal, ItemId, LineItem};
pub use prescription::{Eye, EyeReading, Prescription};
