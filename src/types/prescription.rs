//! Prescription readings for the two eyes.
//!
//! Only sphere and cylinder drive pricing. Either value may be missing for
//! an eye; a missing value contributes no markup.

use rust_decimal::Decimal;

use crate::types::price::{decimal_from_f64, parse_decimal};

// ============================================================================
// Eye enum
// ============================================================================

/// Which eye a reading or a lens line item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Eye {
    /// Right eye (OD)
    Right,
    /// Left eye (OS)
    Left,
}

impl Eye {
    /// Short clinical label
    pub fn label(self) -> &'static str {
        match self {
            Eye::Right => "OD",
            Eye::Left => "OS",
        }
    }

    /// Returns the other eye
    pub fn other(self) -> Self {
        match self {
            Eye::Right => Eye::Left,
            Eye::Left => Eye::Right,
        }
    }
}

// ============================================================================
// EyeReading
// ============================================================================

/// Sphere and cylinder for one eye, in diopters.
///
/// ## Example
///
/// ```
/// use optic_pricing::types::EyeReading;
/// use rust_decimal::Decimal;
///
/// let reading = EyeReading::parse("-4,25", "");
/// assert_eq!(reading.sph, Some(Decimal::new(-425, 2)));
/// assert_eq!(reading.cyl, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EyeReading {
    /// Sphere power; `None` when not specified
    pub sph: Option<Decimal>,

    /// Cylinder power; `None` when not specified
    pub cyl: Option<Decimal>,
}

impl EyeReading {
    /// Create a reading from already-parsed values
    pub fn new(sph: Option<Decimal>, cyl: Option<Decimal>) -> Self {
        Self { sph, cyl }
    }

    /// Create a reading from raw form input.
    ///
    /// Unparseable fields are treated as not specified.
    pub fn parse(sph: &str, cyl: &str) -> Self {
        Self {
            sph: parse_decimal(sph),
            cyl: parse_decimal(cyl),
        }
    }

    /// Create a reading from floating point values.
    ///
    /// NaN and infinities are treated as not specified.
    pub fn from_f64(sph: Option<f64>, cyl: Option<f64>) -> Self {
        Self {
            sph: sph.and_then(decimal_from_f64),
            cyl: cyl.and_then(decimal_from_f64),
        }
    }

    /// Check whether neither value is specified
    pub fn is_empty(&self) -> bool {
        self.sph.is_none() && self.cyl.is_none()
    }
}

// ============================================================================
// Prescription
// ============================================================================

/// Readings for both eyes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prescription {
    pub right: EyeReading,
    pub left: EyeReading,
}

impl Prescription {
    pub fn new(right: EyeReading, left: EyeReading) -> Self {
        Self { right, left }
    }

    /// Get the reading for one eye
    pub fn eye(&self, eye: Eye) -> &EyeReading {
        match eye {
            Eye::Right => &self.right,
            Eye::Left => &self.left,
        }
    }

    /// Get a mutable reading for one eye
    pub fn eye_mut(&mut self, eye: Eye) -> &mut EyeReading {
        match eye {
            Eye::Right => &mut self.right,
            Eye::Left => &mut self.left,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
