//! Fulfillment commands.

use chrono::{DateTime, Utc};
use common::{AllocationId, OrderLineId, ProductId};
use freight::FreightPricing;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How far a shipment travels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// A known distance in kilometres.
    Distance(Decimal),

    /// Two addresses resolved through the distance service.
    Addresses { origin: String, destination: String },
}

impl Route {
    pub fn between(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::Addresses {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

/// Command to price one product without allocating anything.
#[derive(Debug, Clone)]
pub struct QuoteFreight {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub route: Route,

    /// Explicit pricing; fields left out fall back to the pricing policy.
    pub pricing: Option<FreightPricing>,
}

impl QuoteFreight {
    /// Creates a new QuoteFreight command priced by the pricing policy.
    pub fn new(product_id: impl Into<ProductId>, quantity: Decimal, route: Route) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            route,
            pricing: None,
        }
    }

    pub fn with_pricing(mut self, pricing: FreightPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }
}

/// Command to price several products shipped together.
#[derive(Debug, Clone)]
pub struct QuoteBasket {
    pub items: Vec<(ProductId, Decimal)>,
    pub route: Route,
    pub pricing: Option<FreightPricing>,
}

impl QuoteBasket {
    /// Creates a new QuoteBasket command.
    pub fn new(items: Vec<(ProductId, Decimal)>, route: Route) -> Self {
        Self {
            items,
            route,
            pricing: None,
        }
    }

    pub fn with_pricing(mut self, pricing: FreightPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }
}

/// Command to allocate part of an order line to a shipment.
#[derive(Debug, Clone)]
pub struct ScheduleShipment {
    pub line_id: OrderLineId,
    pub quantity: Decimal,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,

    /// Known distance; when absent and both addresses are set the distance
    /// service is asked instead.
    pub distance_km: Option<Decimal>,
    pub pricing: Option<FreightPricing>,
    pub notes: Option<String>,
}

impl ScheduleShipment {
    /// Creates an unscheduled shipment command for `quantity` of a line.
    pub fn new(line_id: OrderLineId, quantity: Decimal) -> Self {
        Self {
            line_id,
            quantity,
            scheduled_at: None,
            origin_address: None,
            destination_address: None,
            distance_km: None,
            pricing: None,
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

    pub fn distance_km(mut self, distance_km: Decimal) -> Self {
        self.distance_km = Some(distance_km);
        self
    }

    pub fn pricing(mut self, pricing: FreightPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Command to move an existing shipment to a new date.
#[derive(Debug, Clone)]
pub struct RescheduleShipment {
    pub line_id: OrderLineId,
    pub allocation_id: AllocationId,
    pub new_scheduled_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl RescheduleShipment {
    /// Creates a new RescheduleShipment command.
    pub fn new(
        line_id: OrderLineId,
        allocation_id: AllocationId,
        new_scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            line_id,
            allocation_id,
            new_scheduled_at,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Command to override the freight charge of an existing shipment.
#[derive(Debug, Clone)]
pub struct RepriceShipment {
    pub line_id: OrderLineId,
    pub allocation_id: AllocationId,
    pub new_value: Decimal,
    pub reason: Option<String>,
}

impl RepriceShipment {
    /// Creates a new RepriceShipment command.
    pub fn new(line_id: OrderLineId, allocation_id: AllocationId, new_value: Decimal) -> Self {
        Self {
            line_id,
            allocation_id,
            new_value,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// One prospective allocation in a batch validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchItem {
    pub line_id: OrderLineId,
    pub quantity: Decimal,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl BatchItem {
    pub fn new(line_id: OrderLineId, quantity: Decimal) -> Self {
        Self {
            line_id,
            quantity,
            scheduled_at: None,
        }
    }

    pub fn at(mut self, scheduled_at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }
}
