//! Freight configuration loaded from environment variables.

use std::str::FromStr;

use freight::PricingDefaults;
use rust_decimal::Decimal;

/// Freight configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `FREIGHT_RATE_PER_WEIGHT_KM`: default price per kg per km (default: unset)
/// - `FREIGHT_MINIMUM_VALUE`: default minimum charge (default: unset)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
///
/// Values that do not parse as decimals are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreightConfig {
    pub rate_per_weight_km: Option<Decimal>,
    pub minimum_freight: Option<Decimal>,
    pub log_level: String,
}

impl FreightConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let decimal = |key: &str| {
            lookup(key).and_then(|raw| Decimal::from_str(raw.trim()).ok())
        };

        Self {
            rate_per_weight_km: decimal("FREIGHT_RATE_PER_WEIGHT_KM"),
            minimum_freight: decimal("FREIGHT_MINIMUM_VALUE"),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Returns the pricing defaults this configuration describes, if a rate
    /// is set.
    pub fn pricing_defaults(&self) -> Option<PricingDefaults> {
        self.rate_per_weight_km
            .map(|rate| PricingDefaults::new(rate, self.minimum_freight))
    }
}

impl Default for FreightConfig {
    fn default() -> Self {
        Self {
            rate_per_weight_km: None,
            minimum_freight: None,
            log_level: "info".to_string(),
        }
    }
}
