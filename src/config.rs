//! Configuration.
//!
//! Tier tables and reconciler settings are edited outside this crate and
//! handed in as TOML. Every section and field is optional; anything missing
//! falls back to the built-in defaults.
//!
//! ```toml
//! [markup]
//! sph = [
//!     { min = 0, max = 4, markup_percent = 0 },
//!     { min = 4, max = 8, markup_percent = 15 },
//!     { min = 8, markup_percent = 30 },
//! ]
//!
//! [reconcile]
//! time_budget_ms = 2000
//! tolerance = "0.01"
//! strategies = ["equal_distribution"]
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::markup::MarkupTables;
use crate::reconcile::Strategy;
use crate::types::price::TOTAL_TOLERANCE;

/// Default wall-clock budget for one reconciliation
pub const DEFAULT_TIME_BUDGET_MS: u64 = 2000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub markup: MarkupTables,

    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Abort reconciliation after this many milliseconds
    pub time_budget_ms: u64,

    /// Allowed gap between the reconciled total and the target, at most 0.01
    pub tolerance: Decimal,

    /// Strategies to try, in order; earlier ones win score ties
    pub strategies: Vec<Strategy>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            tolerance: TOTAL_TOLERANCE,
            strategies: vec![Strategy::EqualDistribution],
        }
    }
}

impl PricingConfig {
    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings the type system cannot.
    ///
    /// Tier tables are validated while deserializing.
    pub fn validate(&self) -> Result<()> {
        let reconcile = &self.reconcile;
        if reconcile.strategies.is_empty() {
            return Err(PricingError::config("at least one reconcile strategy is required"));
        }
        if reconcile.tolerance < Decimal::ZERO || reconcile.tolerance > TOTAL_TOLERANCE {
            return Err(PricingError::config(format!(
                "tolerance must be between 0 and {}, found {}",
                TOTAL_TOLERANCE, reconcile.tolerance
            )));
        }
        if reconcile.time_budget_ms == 0 {
            return Err(PricingError::config("time_budget_ms must be greater than 0"));
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::TierTable;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = PricingConfig::from_toml_str("").unwrap();
        assert_eq!(config, PricingConfig::default());
        assert_eq!(config.reconcile.time_budget_ms, 2000);
        assert_eq!(config.reconcile.tolerance, Decimal::new(1, 2));
        assert_eq!(config.reconcile.strategies, vec![Strategy::EqualDistribution]);
    }

    #[test]
    fn test_custom_sphere_table() {
        let config = PricingConfig::from_toml_str(
            r#"
            [markup]
            sph = [
                { min = 0, max = 6, markup_percent = 0 },
                { min = 6, markup_percent = 20 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.markup.sph.lookup(Decimal::from(6)), Decimal::from(20));
        assert_eq!(config.markup.sph.lookup(Decimal::from(5)), Decimal::ZERO);
        assert_eq!(config.markup.cyl, TierTable::default_cylinder());
    }

    #[test]
    fn test_fractional_breakpoints() {
        let config = PricingConfig::from_toml_str(
            r#"
            [markup]
            cyl = [
                { min = 0, max = 2.25, markup_percent = 0 },
                { min = 2.25, markup_percent = 12.5 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.markup.cyl.lookup(Decimal::new(225, 2)), Decimal::new(125, 1));
    }

    #[test]
    fn test_invalid_tier_table_rejected() {
        let result = PricingConfig::from_toml_str(
            r#"
            [markup]
            sph = [
                { min = 0, max = 4, markup_percent = 0 },
                { min = 5, markup_percent = 15 },
            ]
            "#,
        );
        assert!(matches!(result, Err(PricingError::ConfigParse(_))));
    }

    #[test]
    fn test_reconcile_section() {
        let config = PricingConfig::from_toml_str(
            r#"
            [reconcile]
            time_budget_ms = 500
            strategies = ["quantity_weighted", "equal_distribution"]
            "#,
        )
        .unwrap();

        assert_eq!(config.reconcile.time_budget_ms, 500);
        assert_eq!(config.reconcile.tolerance, TOTAL_TOLERANCE);
        assert_eq!(
            config.reconcile.strategies,
            vec![Strategy::QuantityWeighted, Strategy::EqualDistribution]
        );
    }

    #[test]
    fn test_validate_rejects_empty_strategies() {
        let result = PricingConfig::from_toml_str("[reconcile]\nstrategies = []\n");
        assert!(matches!(result, Err(PricingError::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let result = PricingConfig::from_toml_str("[reconcile]\ntime_budget_ms = 0\n");
        assert!(matches!(result, Err(PricingError::Config { .. })));
    }

    #[test]
    fn test_validate_tolerance_range() {
        let loose = PricingConfig::from_toml_str("[reconcile]\ntolerance = \"5\"\n");
        assert!(matches!(loose, Err(PricingError::Config { .. })));

        let just_over = PricingConfig::from_toml_str("[reconcile]\ntolerance = \"0.011\"\n");
        assert!(matches!(just_over, Err(PricingError::Config { .. })));

        let negative = PricingConfig::from_toml_str("[reconcile]\ntolerance = \"-0.01\"\n");
        assert!(matches!(negative, Err(PricingError::Config { .. })));

        let exact = PricingConfig::from_toml_str("[reconcile]\ntolerance = \"0\"\n").unwrap();
        assert_eq!(exact.reconcile.tolerance, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = PricingConfig::from_toml_str("[reconcile]\nstrategies = [\"magic\"]\n");
        assert!(matches!(result, Err(PricingError::ConfigParse(_))));
    }
}
