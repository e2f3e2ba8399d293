//! Product packaging model.
//!
//! A [`PackagingProfile`] describes one sellable shipping unit of a product:
//! its box geometry in centimetres, its weights in kilograms and the density
//! factor (kg/m³) used to turn volume into a volumetric ("cubed") weight.
//! Profiles are immutable; editing a product replaces its profile wholesale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FreightError, Result, checked_mul};

/// Category name that, together with [`UnitKind::Seeds`], switches a product
/// to the thousand-seed-weight formula.
pub const SEED_CATEGORY: &str = "Seeds";

const CUBIC_CM_PER_CUBIC_M: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Which weight governs the freight charge for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightPolicy {
    /// Charge on declared weight.
    #[default]
    NominalWeight,

    /// Charge on the greater of declared and volumetric weight.
    CubedWeight,
}

impl WeightPolicy {
    /// Returns the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightPolicy::NominalWeight => "NominalWeight",
            WeightPolicy::CubedWeight => "CubedWeight",
        }
    }
}

impl std::fmt::Display for WeightPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of unit a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    #[default]
    Unit,
    Seeds,
    Weight,
    Volume,
}

/// Category and unit information reported by the product catalog.
///
/// Passed in explicitly so the packaging model never reaches into the
/// product/category records itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductClassification {
    /// Name of the product's category.
    pub category_name: String,

    /// Unit the product is sold in.
    pub unit_kind: UnitKind,
}

impl ProductClassification {
    /// Creates a classification.
    pub fn new(category_name: impl Into<String>, unit_kind: UnitKind) -> Self {
        Self {
            category_name: category_name.into(),
            unit_kind,
        }
    }

    /// Returns true for seed products sold by seed count.
    pub fn is_seed_like(&self) -> bool {
        self.category_name.trim().eq_ignore_ascii_case(SEED_CATEGORY)
            && self.unit_kind == UnitKind::Seeds
    }
}

/// Raw packaging fields, as entered on a product or received over the wire.
///
/// Convert into a [`PackagingProfile`] with `PackagingProfile::try_from`,
/// which enforces the packaging invariants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackagingProfileData {
    pub height: Decimal,
    pub width: Decimal,
    pub length: Decimal,
    pub nominal_weight: Decimal,
    pub package_weight: Decimal,
    pub minimum_quantity: u32,
    #[serde(default)]
    pub packaging_label: String,
    #[serde(default)]
    pub density_threshold_low: Option<Decimal>,
    #[serde(default)]
    pub density_threshold_high: Option<Decimal>,
    #[serde(default)]
    pub weight_policy: WeightPolicy,
    #[serde(default)]
    pub classification: ProductClassification,
    /// Grams per thousand seeds; only meaningful for seed products.
    #[serde(default)]
    pub thousand_seed_weight: Option<Decimal>,
}

/// Immutable physical description of a product's shipping unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PackagingProfileData", into = "PackagingProfileData")]
pub struct PackagingProfile {
    height: Decimal,
    width: Decimal,
    length: Decimal,
    nominal_weight: Decimal,
    package_weight: Decimal,
    minimum_quantity: u32,
    packaging_label: String,
    density_threshold_low: Option<Decimal>,
    density_threshold_high: Option<Decimal>,
    weight_policy: WeightPolicy,
    classification: ProductClassification,
    thousand_seed_weight: Option<Decimal>,

    // Derived on construction so out-of-range geometry is rejected up front
    unit_nominal_weight: Decimal,
    unit_volume: Decimal,
    cubed_weight: Option<Decimal>,
}

impl TryFrom<PackagingProfileData> for PackagingProfile {
    type Error = FreightError;

    fn try_from(data: PackagingProfileData) -> Result<Self> {
        for (name, value) in [
            ("height", data.height),
            ("width", data.width),
            ("length", data.length),
        ] {
            if value <= Decimal::ZERO {
                return Err(FreightError::invalid(format!(
                    "packaging {name} must be greater than 0, got {value}"
                )));
            }
        }

        if data.nominal_weight <= Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "nominal weight must be greater than 0, got {}",
                data.nominal_weight
            )));
        }

        if data.package_weight < data.nominal_weight {
            return Err(FreightError::invalid(format!(
                "package weight {} is below nominal weight {}",
                data.package_weight, data.nominal_weight
            )));
        }

        if data.minimum_quantity == 0 {
            return Err(FreightError::invalid("minimum quantity must be at least 1"));
        }

        for (name, value) in [
            ("low", data.density_threshold_low),
            ("high", data.density_threshold_high),
        ] {
            if let Some(density) = value
                && density <= Decimal::ZERO
            {
                return Err(FreightError::invalid(format!(
                    "density threshold {name} must be greater than 0, got {density}"
                )));
            }
        }

        if let (Some(low), Some(high)) = (data.density_threshold_low, data.density_threshold_high)
            && low > high
        {
            return Err(FreightError::invalid(format!(
                "density threshold low {low} exceeds high {high}"
            )));
        }

        if data.weight_policy == WeightPolicy::CubedWeight && data.density_threshold_low.is_none()
        {
            return Err(FreightError::invalid(
                "cubed weight policy requires a low density threshold",
            ));
        }

        if data.classification.is_seed_like() {
            match data.thousand_seed_weight {
                Some(weight) if weight > Decimal::ZERO => {}
                _ => {
                    return Err(FreightError::invalid(
                        "seed products sold by seed count require a positive thousand-seed weight",
                    ));
                }
            }
        }

        let unit_nominal_weight = match data.thousand_seed_weight {
            // Two separate divisions: grams per seed, then kilograms.
            Some(thousand_seed_weight) if data.classification.is_seed_like() => checked_mul(
                "unit weight",
                thousand_seed_weight / Decimal::ONE_THOUSAND / Decimal::ONE_THOUSAND,
                Decimal::from(data.minimum_quantity),
            )?,
            _ => data.nominal_weight,
        };

        let face = checked_mul("unit volume", data.height, data.width)?;
        let unit_volume = checked_mul("unit volume", face, data.length)? / CUBIC_CM_PER_CUBIC_M;
        let cubed_weight = data
            .density_threshold_low
            .map(|density| checked_mul("cubed weight", unit_volume, density))
            .transpose()?;

        Ok(Self {
            unit_nominal_weight,
            unit_volume,
            cubed_weight,
            height: data.height,
            width: data.width,
            length: data.length,
            nominal_weight: data.nominal_weight,
            package_weight: data.package_weight,
            minimum_quantity: data.minimum_quantity,
            packaging_label: data.packaging_label,
            density_threshold_low: data.density_threshold_low,
            density_threshold_high: data.density_threshold_high,
            weight_policy: data.weight_policy,
            classification: data.classification,
            thousand_seed_weight: data.thousand_seed_weight,
        })
    }
}

impl From<PackagingProfile> for PackagingProfileData {
    fn from(profile: PackagingProfile) -> Self {
        Self {
            height: profile.height,
            width: profile.width,
            length: profile.length,
            nominal_weight: profile.nominal_weight,
            package_weight: profile.package_weight,
            minimum_quantity: profile.minimum_quantity,
            packaging_label: profile.packaging_label,
            density_threshold_low: profile.density_threshold_low,
            density_threshold_high: profile.density_threshold_high,
            weight_policy: profile.weight_policy,
            classification: profile.classification,
            thousand_seed_weight: profile.thousand_seed_weight,
        }
    }
}

// Derived figures
impl PackagingProfile {
    /// Weight of one sellable unit in kilograms.
    ///
    /// Seed products sold by seed count derive it from the thousand-seed
    /// weight (grams) and the minimum quantity (seeds per unit); everything
    /// else uses the declared nominal weight.
    pub fn unit_nominal_weight(&self) -> Decimal {
        self.unit_nominal_weight
    }

    /// Volume of one unit in cubic metres.
    pub fn unit_volume(&self) -> Decimal {
        self.unit_volume
    }

    /// Volumetric weight of one unit, if a density factor is configured.
    pub fn cubed_weight(&self) -> Option<Decimal> {
        self.cubed_weight
    }
}

// Accessors
impl PackagingProfile {
    pub fn height(&self) -> Decimal {
        self.height
    }

    pub fn width(&self) -> Decimal {
        self.width
    }

    pub fn length(&self) -> Decimal {
        self.length
    }

    pub fn nominal_weight(&self) -> Decimal {
        self.nominal_weight
    }

    pub fn package_weight(&self) -> Decimal {
        self.package_weight
    }

    pub fn minimum_quantity(&self) -> u32 {
        self.minimum_quantity
    }

    pub fn packaging_label(&self) -> &str {
        &self.packaging_label
    }

    pub fn density_threshold_low(&self) -> Option<Decimal> {
        self.density_threshold_low
    }

    pub fn density_threshold_high(&self) -> Option<Decimal> {
        self.density_threshold_high
    }

    pub fn weight_policy(&self) -> WeightPolicy {
        self.weight_policy
    }

    pub fn classification(&self) -> &ProductClassification {
        &self.classification
    }

    pub fn thousand_seed_weight(&self) -> Option<Decimal> {
        self.thousand_seed_weight
    }
}
