//! Freight calculation results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, checked_add};
use crate::packaging::WeightPolicy;

/// Weight, volume and cost figures for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreightComputationResult {
    /// Nominal weight of the whole quantity (kg).
    pub total_weight: Decimal,

    /// Volume of the whole quantity (m³).
    pub total_volume: Decimal,

    /// Volumetric weight of the whole quantity; only computed under
    /// [`WeightPolicy::CubedWeight`].
    pub cubed_weight: Option<Decimal>,

    /// Weight the charge was based on.
    pub weight_used_for_freight: Decimal,

    /// Freight charge, never below the applicable minimum.
    pub freight_value: Decimal,

    pub distance_km: Decimal,

    pub policy_used: WeightPolicy,
}

/// Per-item results for a basket plus consolidated totals.
///
/// Totals cover weight and volume only. Item charges are not folded into a
/// single charge; use [`item_freight_total`] when a plain sum
/// of the individual charges is what the caller wants, or price the
/// consolidated weight separately.
///
/// [`item_freight_total`]: ConsolidatedFreightResult::item_freight_total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedFreightResult {
    pub items: Vec<FreightComputationResult>,
    pub total_weight: Decimal,
    pub total_volume: Decimal,
    /// Sum of item cubed weights, items without one counting as zero.
    pub total_cubed_weight: Decimal,
    pub total_weight_used_for_freight: Decimal,
    pub distance_km: Decimal,
    item_freight_total: Decimal,
}

impl ConsolidatedFreightResult {
    pub(crate) fn from_items(
        items: Vec<FreightComputationResult>,
        distance_km: Decimal,
    ) -> Result<Self> {
        let mut total_weight = Decimal::ZERO;
        let mut total_volume = Decimal::ZERO;
        let mut total_cubed_weight = Decimal::ZERO;
        let mut total_weight_used_for_freight = Decimal::ZERO;
        let mut item_freight_total = Decimal::ZERO;

        for item in &items {
            total_weight = checked_add("total weight", total_weight, item.total_weight)?;
            total_volume = checked_add("total volume", total_volume, item.total_volume)?;
            total_cubed_weight = checked_add(
                "total cubed weight",
                total_cubed_weight,
                item.cubed_weight.unwrap_or(Decimal::ZERO),
            )?;
            total_weight_used_for_freight = checked_add(
                "total freight weight",
                total_weight_used_for_freight,
                item.weight_used_for_freight,
            )?;
            item_freight_total =
                checked_add("freight total", item_freight_total, item.freight_value)?;
        }

        Ok(Self {
            items,
            total_weight,
            total_volume,
            total_cubed_weight,
            total_weight_used_for_freight,
            distance_km,
            item_freight_total,
        })
    }

    /// Returns the number of items in the basket.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of the individual item charges.
    pub fn item_freight_total(&self) -> Decimal {
        self.item_freight_total
    }
}
