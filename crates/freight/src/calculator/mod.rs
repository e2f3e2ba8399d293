//! Freight cost calculator.
//!
//! Pure computation from packaging geometry, quantity and distance to the
//! weight, volume and monetary charge of a shipment. Nothing here touches
//! an order line; quotes can be produced before any shipment exists.

mod pricing;
mod result;

pub use pricing::{FreightPricing, PricingDefaults};
pub use result::{ConsolidatedFreightResult, FreightComputationResult};

use rust_decimal::Decimal;

use crate::error::{FreightError, Result, checked_mul};
use crate::packaging::{PackagingProfile, WeightPolicy};

use pricing::ResolvedPricing;

/// Computes freight figures for line items and baskets.
#[derive(Debug, Clone, Default)]
pub struct FreightCalculator {
    defaults: Option<PricingDefaults>,
}

impl FreightCalculator {
    /// Creates a calculator with no default pricing; every call must supply
    /// a rate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a calculator that falls back to `defaults` when a call leaves
    /// the rate or minimum out.
    pub fn with_defaults(defaults: PricingDefaults) -> Self {
        Self {
            defaults: Some(defaults),
        }
    }

    /// Returns the configured default pricing, if any.
    pub fn defaults(&self) -> Option<&PricingDefaults> {
        self.defaults.as_ref()
    }

    /// Computes weight, volume and charge for `quantity` units of one
    /// product shipped over `distance_km`.
    ///
    /// Under [`WeightPolicy::CubedWeight`] the heavier of nominal and
    /// volumetric weight is chosen per unit before scaling by quantity;
    /// nominal weight wins a tie.
    pub fn calculate_freight(
        &self,
        profile: &PackagingProfile,
        quantity: Decimal,
        distance_km: Decimal,
        pricing: &FreightPricing,
    ) -> Result<FreightComputationResult> {
        if quantity <= Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "quantity must be greater than 0, got {quantity}"
            )));
        }

        if distance_km <= Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "distance must be greater than 0 km, got {distance_km}"
            )));
        }

        let pricing = ResolvedPricing::resolve(pricing, self.defaults.as_ref())?;

        let unit_weight = profile.unit_nominal_weight();
        let total_weight = checked_mul("total weight", unit_weight, quantity)?;
        let total_volume = checked_mul("total volume", profile.unit_volume(), quantity)?;

        let (cubed_weight, weight_used_for_freight) = match profile.weight_policy() {
            WeightPolicy::CubedWeight => {
                let unit_cubed = profile.cubed_weight();
                let cubed_weight = unit_cubed
                    .map(|cubed| checked_mul("cubed weight", cubed, quantity))
                    .transpose()?;
                let unit_cubed = unit_cubed.unwrap_or(Decimal::ZERO);
                let governing = if unit_cubed > unit_weight {
                    unit_cubed
                } else {
                    unit_weight
                };
                (cubed_weight, checked_mul("freight weight", governing, quantity)?)
            }
            WeightPolicy::NominalWeight => (None, total_weight),
        };

        let weight_distance = checked_mul("freight charge", weight_used_for_freight, distance_km)?;
        let distance_charge = checked_mul("freight charge", weight_distance, pricing.rate)?;
        let freight_value = distance_charge.max(pricing.minimum);

        tracing::debug!(
            policy = %profile.weight_policy(),
            %quantity,
            %distance_km,
            %weight_used_for_freight,
            %freight_value,
            "freight calculated"
        );

        Ok(FreightComputationResult {
            total_weight,
            total_volume,
            cubed_weight,
            weight_used_for_freight,
            freight_value,
            distance_km,
            policy_used: profile.weight_policy(),
        })
    }

    /// Prices every item of a basket independently over the same distance
    /// and pricing, and sums their weights and volumes.
    pub fn calculate_consolidated_freight(
        &self,
        items: &[(PackagingProfile, Decimal)],
        distance_km: Decimal,
        pricing: &FreightPricing,
    ) -> Result<ConsolidatedFreightResult> {
        if items.is_empty() {
            return Err(FreightError::invalid(
                "consolidated freight needs at least one item",
            ));
        }

        let results = items
            .iter()
            .map(|(profile, quantity)| {
                self.calculate_freight(profile, *quantity, distance_km, pricing)
            })
            .collect::<Result<Vec<_>>>()?;

        ConsolidatedFreightResult::from_items(results, distance_km)
    }
}
