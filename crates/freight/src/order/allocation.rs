//! Shipment allocation record.

use chrono::{DateTime, Utc};
use common::{AllocationId, OrderLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator::FreightComputationResult;

use super::AllocationStatus;

/// A quantity of an order line committed to one physical shipment.
///
/// Allocations belong to exactly one [`OrderLine`](super::OrderLine) and are
/// only created or changed through the
/// [`AllocationLedger`](crate::ledger::AllocationLedger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentAllocation {
    id: AllocationId,
    order_line_id: OrderLineId,
    quantity: Decimal,
    status: AllocationStatus,
    scheduled_at: Option<DateTime<Utc>>,
    freight_value: Decimal,
    total_weight: Option<Decimal>,
    total_volume: Option<Decimal>,
    origin_address: Option<String>,
    destination_address: Option<String>,
    notes: String,
    created_at: DateTime<Utc>,
}

// Query methods
impl ShipmentAllocation {
    pub fn id(&self) -> AllocationId {
        self.id
    }

    pub fn order_line_id(&self) -> OrderLineId {
        self.order_line_id
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn status(&self) -> AllocationStatus {
        self.status
    }

    /// Planned shipping date; `None` until scheduled.
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }

    /// Returns true if a shipping date is set.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_at.is_some()
    }

    /// Freight charge; zero until priced.
    pub fn freight_value(&self) -> Decimal {
        self.freight_value
    }

    pub fn total_weight(&self) -> Option<Decimal> {
        self.total_weight
    }

    pub fn total_volume(&self) -> Option<Decimal> {
        self.total_volume
    }

    pub fn origin_address(&self) -> Option<&str> {
        self.origin_address.as_deref()
    }

    pub fn destination_address(&self) -> Option<&str> {
        self.destination_address.as_deref()
    }

    /// Audit trail, one entry per line.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// Mutation, reserved for the ledger
impl ShipmentAllocation {
    pub(crate) fn new(
        order_line_id: OrderLineId,
        quantity: Decimal,
        scheduled_at: Option<DateTime<Utc>>,
        origin_address: Option<String>,
        destination_address: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AllocationId::new(),
            order_line_id,
            quantity,
            status: AllocationStatus::initial(scheduled_at.is_some()),
            scheduled_at,
            freight_value: Decimal::ZERO,
            total_weight: None,
            total_volume: None,
            origin_address,
            destination_address,
            notes: String::new(),
            created_at,
        }
    }

    pub(crate) fn apply_freight(&mut self, result: &FreightComputationResult) {
        self.freight_value = result.freight_value;
        self.total_weight = Some(result.total_weight);
        self.total_volume = Some(result.total_volume);
    }

    pub(crate) fn set_schedule(&mut self, scheduled_at: DateTime<Utc>) {
        self.scheduled_at = Some(scheduled_at);
        self.status = self.status.after_reschedule();
    }

    pub(crate) fn set_freight_value(&mut self, freight_value: Decimal) {
        self.freight_value = freight_value;
    }

    /// Appends one entry to the audit trail; existing notes are never
    /// rewritten.
    pub(crate) fn append_note(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(entry);
    }
}
