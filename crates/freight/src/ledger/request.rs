//! Inputs and outputs of ledger operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator::FreightPricing;
use crate::order::OrderLine;
use crate::packaging::PackagingProfile;

/// What the ledger needs to price a new allocation on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct FreightBasis {
    /// Packaging profile of the line's product.
    pub profile: PackagingProfile,
    pub distance_km: Decimal,
    pub pricing: FreightPricing,
}

/// Request to allocate part of an order line to a shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    pub quantity: Decimal,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    /// When present, the allocation is priced as it is created; otherwise
    /// freight is left at zero for a later pricing call.
    pub freight: Option<FreightBasis>,
    pub notes: Option<String>,
}

impl AllocationRequest {
    /// Creates an unscheduled, unpriced request for `quantity`.
    pub fn new(quantity: Decimal) -> Self {
        Self {
            quantity,
            scheduled_at: None,
            origin_address: None,
            destination_address: None,
            freight: None,
            notes: None,
        }
    }

    pub fn scheduled_at(mut self, scheduled_at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    pub fn route(mut self, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        self.origin_address = Some(origin.into());
        self.destination_address = Some(destination.into());
        self
    }

    pub fn priced(
        mut self,
        profile: PackagingProfile,
        distance_km: Decimal,
        pricing: FreightPricing,
    ) -> Self {
        self.freight = Some(FreightBasis {
            profile,
            distance_km,
            pricing,
        });
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// One entry of a batch validation.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    pub line: &'a OrderLine,
    pub quantity: Decimal,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl<'a> BatchRequest<'a> {
    pub fn new(line: &'a OrderLine, quantity: Decimal, scheduled_at: Option<DateTime<Utc>>) -> Self {
        Self {
            line,
            quantity,
            scheduled_at,
        }
    }
}

/// Outcome of a batch validation, with every problem found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl BatchValidation {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
