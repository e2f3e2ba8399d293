//! Pricing policy trait and static implementation.

use async_trait::async_trait;
use common::ProductId;
use freight::PricingDefaults;

use crate::config::FreightConfig;
use crate::error::Result;

/// Source of default freight pricing.
#[async_trait]
pub trait PricingPolicy: Send + Sync {
    /// Returns the default pricing for `product_id`, or `None` if no default
    /// is configured.
    async fn default_pricing(&self, product_id: &ProductId) -> Result<Option<PricingDefaults>>;
}

/// Pricing policy that returns the same defaults for every product.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPricingPolicy {
    defaults: Option<PricingDefaults>,
}

impl StaticPricingPolicy {
    pub fn new(defaults: Option<PricingDefaults>) -> Self {
        Self { defaults }
    }

    /// Builds the policy from the configured default rate and minimum.
    pub fn from_config(config: &FreightConfig) -> Self {
        Self::new(config.pricing_defaults())
    }
}

#[async_trait]
impl PricingPolicy for StaticPricingPolicy {
    async fn default_pricing(&self, _product_id: &ProductId) -> Result<Option<PricingDefaults>> {
        Ok(self.defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_policy_from_config() {
        let config = FreightConfig {
            rate_per_weight_km: Some(dec!(0.05)),
            minimum_freight: None,
            ..Default::default()
        };
        let policy = StaticPricingPolicy::from_config(&config);

        let defaults = policy.default_pricing(&ProductId::new("SKU-1")).await.unwrap();
        assert_eq!(defaults, Some(PricingDefaults::new(dec!(0.05), None)));
    }

    #[tokio::test]
    async fn test_unconfigured_policy_has_no_defaults() {
        let policy = StaticPricingPolicy::default();
        assert_eq!(policy.default_pricing(&ProductId::new("SKU-1")).await.unwrap(), None);
    }
}
