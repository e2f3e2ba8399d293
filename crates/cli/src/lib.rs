//! Freight quoting from JSON baskets.
//!
//! A basket lists packaging profiles with quantities, one distance and
//! optional pricing. Rates left out of the basket fall back to the
//! configured defaults.

use freight::{ConsolidatedFreightResult, FreightCalculator, FreightPricing, PackagingProfile};
use fulfillment::FreightConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while quoting a basket.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid basket: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Freight(#[from] freight::FreightError),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// One product in a basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketItem {
    pub profile: PackagingProfile,
    pub quantity: Decimal,
}

/// A basket shipped together over one distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    pub items: Vec<BasketItem>,
    pub distance_km: Decimal,
    #[serde(default)]
    pub pricing: FreightPricing,
}

/// Prices a basket with the defaults from `config`.
pub fn quote(basket: &Basket, config: &FreightConfig) -> Result<ConsolidatedFreightResult> {
    let calculator = match config.pricing_defaults() {
        Some(defaults) => FreightCalculator::with_defaults(defaults),
        None => FreightCalculator::new(),
    };

    let items: Vec<(PackagingProfile, Decimal)> = basket
        .items
        .iter()
        .map(|item| (item.profile.clone(), item.quantity))
        .collect();

    let result =
        calculator.calculate_consolidated_freight(&items, basket.distance_km, &basket.pricing)?;
    tracing::info!(
        items = result.item_count(),
        freight_value = %result.item_freight_total(),
        "basket quoted"
    );
    Ok(result)
}

/// Parses a JSON basket and returns the quote as pretty-printed JSON.
pub fn run(input: &str, config: &FreightConfig) -> Result<String> {
    let basket: Basket = serde_json::from_str(input)?;
    let result = quote(&basket, config)?;
    Ok(serde_json::to_string_pretty(&result)?)
}
