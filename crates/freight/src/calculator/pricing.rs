//! Freight pricing parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FreightError, Result};

/// Pricing supplied by the caller for one calculation.
///
/// Either field may be left out, in which case the calculator falls back to
/// its configured [`PricingDefaults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FreightPricing {
    /// Price per kilogram per kilometre.
    #[serde(default)]
    pub rate_per_weight_km: Option<Decimal>,

    /// Floor for the freight charge.
    #[serde(default)]
    pub minimum_freight: Option<Decimal>,
}

impl FreightPricing {
    /// Pricing that defers entirely to the configured defaults.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Pricing with an explicit rate and no explicit minimum.
    pub fn with_rate(rate_per_weight_km: Decimal) -> Self {
        Self {
            rate_per_weight_km: Some(rate_per_weight_km),
            minimum_freight: None,
        }
    }

    /// Sets an explicit minimum charge.
    pub fn with_minimum(mut self, minimum_freight: Decimal) -> Self {
        self.minimum_freight = Some(minimum_freight);
        self
    }

    /// Fills fields left out with `defaults`, keeping explicit values.
    pub fn or_defaults(self, defaults: Option<&PricingDefaults>) -> Self {
        Self {
            rate_per_weight_km: self
                .rate_per_weight_km
                .or_else(|| defaults.map(|d| d.rate_per_weight_km)),
            minimum_freight: self
                .minimum_freight
                .or_else(|| defaults.and_then(|d| d.minimum_freight)),
        }
    }

    /// Returns true if a rate is known.
    pub fn has_rate(&self) -> bool {
        self.rate_per_weight_km.is_some()
    }
}

/// Default pricing provided by the external pricing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingDefaults {
    pub rate_per_weight_km: Decimal,
    #[serde(default)]
    pub minimum_freight: Option<Decimal>,
}

impl PricingDefaults {
    pub fn new(rate_per_weight_km: Decimal, minimum_freight: Option<Decimal>) -> Self {
        Self {
            rate_per_weight_km,
            minimum_freight,
        }
    }
}

/// Rate and minimum after applying defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedPricing {
    pub rate: Decimal,
    pub minimum: Decimal,
}

impl ResolvedPricing {
    /// Fills in missing values from `defaults`.
    ///
    /// A missing rate is an error rather than zero; a missing minimum means
    /// no floor.
    pub fn resolve(pricing: &FreightPricing, defaults: Option<&PricingDefaults>) -> Result<Self> {
        let pricing = pricing.or_defaults(defaults);
        let rate = pricing
            .rate_per_weight_km
            .ok_or(FreightError::MissingPricingPolicy)?;
        let minimum = pricing.minimum_freight.unwrap_or(Decimal::ZERO);

        if rate < Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "freight rate must not be negative, got {rate}"
            )));
        }

        if minimum < Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "minimum freight must not be negative, got {minimum}"
            )));
        }

        Ok(Self { rate, minimum })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_explicit_values_win_over_defaults() {
        let defaults = PricingDefaults::new(dec!(0.10), Some(dec!(50)));
        let pricing = FreightPricing::with_rate(dec!(0.25)).with_minimum(dec!(80));

        let resolved = ResolvedPricing::resolve(&pricing, Some(&defaults)).unwrap();
        assert_eq!(resolved.rate, dec!(0.25));
        assert_eq!(resolved.minimum, dec!(80));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let defaults = PricingDefaults::new(dec!(0.10), Some(dec!(50)));

        let resolved = ResolvedPricing::resolve(&FreightPricing::defaults(), Some(&defaults)).unwrap();
        assert_eq!(resolved.rate, dec!(0.10));
        assert_eq!(resolved.minimum, dec!(50));
    }

    #[test]
    fn test_or_defaults_keeps_explicit_values() {
        let defaults = PricingDefaults::new(dec!(0.10), Some(dec!(50)));
        let merged = FreightPricing::with_rate(dec!(0.3)).or_defaults(Some(&defaults));
        assert_eq!(merged.rate_per_weight_km, Some(dec!(0.3)));
        assert_eq!(merged.minimum_freight, Some(dec!(50)));
        assert!(!FreightPricing::defaults().or_defaults(None).has_rate());
    }

    #[test]
    fn test_missing_rate_without_defaults_is_an_error() {
        let pricing = FreightPricing {
            rate_per_weight_km: None,
            minimum_freight: Some(dec!(10)),
        };
        let err = ResolvedPricing::resolve(&pricing, None).unwrap_err();
        assert_eq!(err, FreightError::MissingPricingPolicy);
    }

    #[test]
    fn test_missing_minimum_means_no_floor() {
        let resolved = ResolvedPricing::resolve(&FreightPricing::with_rate(dec!(1)), None).unwrap();
        assert_eq!(resolved.minimum, Decimal::ZERO);
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let err = ResolvedPricing::resolve(&FreightPricing::with_rate(dec!(-1)), None).unwrap_err();
        assert!(matches!(err, FreightError::InvalidArgument(_)));
    }
}
