//! Shipment allocation ledger.
//!
//! Guards the central property of the engine: the quantities of all
//! allocations on an order line never add up to more than was ordered.
//! Every operation reads the line, checks, and mutates in one step with no
//! suspension point. Exclusive access to the line for the duration of a call
//! is the caller's job (see `fulfillment::OrderLineStore`).

mod request;
mod summary;

pub use request::{AllocationRequest, BatchRequest, BatchValidation, FreightBasis};
pub use summary::TransportSummary;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::calculator::FreightCalculator;
use crate::clock::{Clock, SystemClock};
use crate::error::{FreightError, Result};
use crate::order::{Order, OrderLine, ShipmentAllocation};

const AUDIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Creates, reschedules and re-prices shipment allocations.
#[derive(Clone)]
pub struct AllocationLedger {
    calculator: FreightCalculator,
    clock: Arc<dyn Clock>,
}

impl AllocationLedger {
    /// Creates a ledger that checks schedules against the system clock.
    pub fn new(calculator: FreightCalculator) -> Self {
        Self::with_clock(calculator, Arc::new(SystemClock))
    }

    /// Creates a ledger with an explicit time source.
    pub fn with_clock(calculator: FreightCalculator, clock: Arc<dyn Clock>) -> Self {
        Self { calculator, clock }
    }

    /// Returns the calculator used to price new allocations.
    pub fn calculator(&self) -> &FreightCalculator {
        &self.calculator
    }

    /// Quantity of the line not yet committed to any allocation.
    pub fn available_quantity(&self, line: &OrderLine) -> Decimal {
        line.ordered_quantity() - line.allocated_quantity()
    }

    /// Returns true if `requested` still fits on the line.
    pub fn validate_capacity(&self, line: &OrderLine, requested: Decimal) -> bool {
        requested <= self.available_quantity(line)
    }

    /// Allocates part of `line` to a new shipment.
    ///
    /// On any error the line is left exactly as it was.
    pub fn create_allocation(
        &self,
        line: &mut OrderLine,
        request: AllocationRequest,
    ) -> Result<ShipmentAllocation> {
        let available = self.available_quantity(line);
        if request.quantity > available {
            tracing::warn!(
                line_id = %line.id(),
                requested = %request.quantity,
                %available,
                "allocation rejected: insufficient capacity"
            );
            return Err(FreightError::InsufficientCapacity {
                requested: request.quantity,
                available,
            });
        }

        if request.quantity <= Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "allocation quantity must be greater than 0, got {}",
                request.quantity
            )));
        }

        let now = self.clock.now();
        if let Some(at) = request.scheduled_at {
            self.ensure_not_past(at, now)?;
        }

        let priced = request
            .freight
            .as_ref()
            .map(|basis| {
                self.calculator.calculate_freight(
                    &basis.profile,
                    request.quantity,
                    basis.distance_km,
                    &basis.pricing,
                )
            })
            .transpose()?;

        let mut allocation = ShipmentAllocation::new(
            line.id(),
            request.quantity,
            request.scheduled_at,
            request.origin_address,
            request.destination_address,
            now,
        );
        if let Some(result) = &priced {
            allocation.apply_freight(result);
        }
        if let Some(notes) = &request.notes {
            allocation.append_note(notes);
        }

        tracing::debug!(
            line_id = %line.id(),
            allocation_id = %allocation.id(),
            quantity = %allocation.quantity(),
            freight_value = %allocation.freight_value(),
            "shipment allocation created"
        );

        line.push_allocation(allocation.clone());
        Ok(allocation)
    }

    /// Moves an allocation to a new shipping date and records the change.
    pub fn reschedule(
        &self,
        allocation: &mut ShipmentAllocation,
        new_scheduled_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<()> {
        self.ensure_not_past(new_scheduled_at, self.clock.now())?;

        let from = allocation
            .scheduled_at()
            .map(|at| at.format(AUDIT_TIME_FORMAT).to_string())
            .unwrap_or_else(|| "unscheduled".to_string());
        let to = new_scheduled_at.format(AUDIT_TIME_FORMAT).to_string();

        allocation.set_schedule(new_scheduled_at);
        allocation.append_note(&audit_entry(
            format!("Rescheduled from {from} to {to}"),
            note,
        ));

        tracing::debug!(
            allocation_id = %allocation.id(),
            status = %allocation.status(),
            %from,
            %to,
            "shipment allocation rescheduled"
        );
        Ok(())
    }

    /// Replaces an allocation's freight charge and records the old value.
    pub fn update_freight_value(
        &self,
        allocation: &mut ShipmentAllocation,
        new_value: Decimal,
        reason: Option<&str>,
    ) -> Result<()> {
        if new_value < Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "freight value must not be negative, got {new_value}"
            )));
        }

        let old_value = allocation.freight_value();
        allocation.set_freight_value(new_value);
        allocation.append_note(&audit_entry(
            format!("Freight changed from {old_value} to {new_value}"),
            reason,
        ));

        tracing::debug!(
            allocation_id = %allocation.id(),
            %old_value,
            %new_value,
            "shipment freight updated"
        );
        Ok(())
    }

    /// Validates a set of prospective allocations without applying any.
    ///
    /// Each request is checked against its line as it stands now; requests
    /// in the same batch do not consume each other's capacity. All failures
    /// are collected.
    pub fn validate_batch(&self, requests: &[BatchRequest<'_>]) -> BatchValidation {
        let now = self.clock.now();
        let mut errors = Vec::new();

        for request in requests {
            let prefix = format!("Line {}", request.line.id());

            if request.quantity <= Decimal::ZERO {
                errors.push(format!(
                    "{prefix}: quantity must be greater than 0, got {}",
                    request.quantity
                ));
            }

            if let Some(at) = request.scheduled_at
                && let Err(e) = self.ensure_not_past(at, now)
            {
                errors.push(format!("{prefix}: {e}"));
            }

            let available = self.available_quantity(request.line);
            if request.quantity > available {
                let e = FreightError::InsufficientCapacity {
                    requested: request.quantity,
                    available,
                };
                errors.push(format!("{prefix}: {e}"));
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                requests = requests.len(),
                failures = errors.len(),
                "batch validation failed"
            );
        }

        BatchValidation::from_errors(errors)
    }

    /// Aggregates transport figures across an order.
    pub fn summarize(&self, order: &Order) -> Result<TransportSummary> {
        TransportSummary::from_order(order, self.clock.now())
    }

    fn ensure_not_past(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
        if at < now {
            return Err(FreightError::invalid(format!(
                "scheduled date {} is in the past",
                at.format(AUDIT_TIME_FORMAT)
            )));
        }
        Ok(())
    }
}

fn audit_entry(head: String, detail: Option<&str>) -> String {
    match detail.map(str::trim).filter(|d| !d.is_empty()) {
        Some(detail) => format!("{head}: {detail}"),
        None => head,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::FreightPricing;
    use crate::clock::FixedClock;
    use crate::order::AllocationStatus;
    use crate::packaging::{PackagingProfile, PackagingProfileData};
    use chrono::{Duration, TimeZone};
    use common::OrderId;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    fn ledger() -> AllocationLedger {
        AllocationLedger::with_clock(FreightCalculator::new(), Arc::new(FixedClock::new(now())))
    }

    fn line(ordered: Decimal) -> OrderLine {
        OrderLine::new(OrderId::new(), "SKU-CORN", ordered, dec!(10), dec!(0)).unwrap()
    }

    fn profile() -> PackagingProfile {
        PackagingProfile::try_from(PackagingProfileData {
            height: dec!(10),
            width: dec!(10),
            length: dec!(10),
            nominal_weight: dec!(5),
            package_weight: dec!(5),
            minimum_quantity: 1,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_available_quantity_subtracts_allocations() {
        let ledger = ledger();
        let mut line = line(dec!(100));
        ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(25)))
            .unwrap();
        ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(35)))
            .unwrap();

        assert_eq!(ledger.available_quantity(&line), dec!(40));
        assert_eq!(ledger.available_quantity(&line), dec!(40));
        assert!(ledger.validate_capacity(&line, dec!(40)));
        assert!(!ledger.validate_capacity(&line, dec!(40.01)));
    }

    #[test]
    fn test_over_allocation_reports_requested_and_available() {
        let ledger = ledger();
        let mut line = line(dec!(100));
        ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(25)))
            .unwrap();
        ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(35)))
            .unwrap();

        let err = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(50)))
            .unwrap_err();

        assert_eq!(
            err,
            FreightError::InsufficientCapacity {
                requested: dec!(50),
                available: dec!(40),
            }
        );
        let message = err.to_string();
        assert!(message.contains("50"));
        assert!(message.contains("40"));
        assert_eq!(line.shipments().len(), 2);
    }

    #[test]
    fn test_exact_remaining_quantity_can_be_allocated() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(10)))
            .unwrap();
        assert_eq!(ledger.available_quantity(&line), Decimal::ZERO);

        let err = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(0.5)))
            .unwrap_err();
        assert!(matches!(err, FreightError::InsufficientCapacity { .. }));
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let err = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(0)))
            .unwrap_err();
        assert!(matches!(err, FreightError::InvalidArgument(_)));
        assert!(line.shipments().is_empty());
    }

    #[test]
    fn test_rejects_past_schedule_without_mutation() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let request = AllocationRequest::new(dec!(5)).scheduled_at(now() - Duration::hours(1));

        let err = ledger.create_allocation(&mut line, request).unwrap_err();
        assert!(matches!(err, FreightError::InvalidArgument(msg) if msg.contains("past")));
        assert!(line.shipments().is_empty());
    }

    #[test]
    fn test_capacity_is_checked_before_arguments() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let request = AllocationRequest::new(dec!(11)).scheduled_at(now() - Duration::days(1));

        let err = ledger.create_allocation(&mut line, request).unwrap_err();
        assert!(matches!(err, FreightError::InsufficientCapacity { .. }));
    }

    #[test]
    fn test_priced_allocation_carries_freight_figures() {
        let ledger = ledger();
        let mut line = line(dec!(100));
        let request = AllocationRequest::new(dec!(20))
            .scheduled_at(now() + Duration::days(3))
            .route("Farm A", "Silo B")
            .priced(profile(), dec!(120), FreightPricing::with_rate(dec!(0.05)))
            .notes("first truck");

        let allocation = ledger.create_allocation(&mut line, request).unwrap();

        assert_eq!(allocation.total_weight(), Some(dec!(100)));
        assert_eq!(allocation.total_volume(), Some(dec!(0.02)));
        assert_eq!(allocation.freight_value(), dec!(600));
        assert_eq!(allocation.origin_address(), Some("Farm A"));
        assert_eq!(allocation.destination_address(), Some("Silo B"));
        assert_eq!(allocation.notes(), "first truck");
        assert_eq!(allocation.status(), AllocationStatus::Scheduled);
        assert_eq!(line.shipments()[0], allocation);
    }

    #[test]
    fn test_pricing_failure_leaves_line_untouched() {
        let ledger = ledger();
        let mut line = line(dec!(100));
        let request =
            AllocationRequest::new(dec!(20)).priced(profile(), dec!(120), FreightPricing::defaults());

        let err = ledger.create_allocation(&mut line, request).unwrap_err();
        assert_eq!(err, FreightError::MissingPricingPolicy);
        assert!(line.shipments().is_empty());
    }

    #[test]
    fn test_unpriced_allocation_leaves_freight_empty() {
        let ledger = ledger();
        let mut line = line(dec!(100));
        let allocation = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(20)))
            .unwrap();

        assert_eq!(allocation.freight_value(), Decimal::ZERO);
        assert_eq!(allocation.total_weight(), None);
        assert_eq!(allocation.status(), AllocationStatus::Created);
    }

    #[test]
    fn test_reschedule_records_audit_entry() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let first = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 6, 12, 14, 30, 0).unwrap();
        let id = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(5)).scheduled_at(first))
            .unwrap()
            .id();

        let allocation = line.allocation_mut(id).unwrap();
        ledger
            .reschedule(allocation, second, Some("truck unavailable"))
            .unwrap();

        assert_eq!(allocation.scheduled_at(), Some(second));
        assert_eq!(allocation.status(), AllocationStatus::Rescheduled);
        assert_eq!(
            allocation.notes(),
            "Rescheduled from 2025-06-10 08:00 UTC to 2025-06-12 14:30 UTC: truck unavailable"
        );
    }

    #[test]
    fn test_scheduling_an_unscheduled_allocation() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let at = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        let id = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(5)))
            .unwrap()
            .id();

        let allocation = line.allocation_mut(id).unwrap();
        ledger.reschedule(allocation, at, None).unwrap();

        assert_eq!(allocation.status(), AllocationStatus::Scheduled);
        assert_eq!(
            allocation.notes(),
            "Rescheduled from unscheduled to 2025-06-10 08:00 UTC"
        );
    }

    #[test]
    fn test_reschedule_into_past_leaves_date_unchanged() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let at = now() + Duration::days(2);
        let id = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(5)).scheduled_at(at))
            .unwrap()
            .id();

        let allocation = line.allocation_mut(id).unwrap();
        let err = ledger
            .reschedule(allocation, now() - Duration::minutes(1), Some("oops"))
            .unwrap_err();

        assert!(matches!(err, FreightError::InvalidArgument(_)));
        assert_eq!(allocation.scheduled_at(), Some(at));
        assert_eq!(allocation.status(), AllocationStatus::Scheduled);
        assert!(allocation.notes().is_empty());
    }

    #[test]
    fn test_update_freight_value_appends_audit_entry() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let id = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(5)).notes("created"))
            .unwrap()
            .id();

        let allocation = line.allocation_mut(id).unwrap();
        ledger
            .update_freight_value(allocation, dec!(150.00), Some("carrier quote"))
            .unwrap();
        ledger
            .update_freight_value(allocation, dec!(175.50), None)
            .unwrap();

        assert_eq!(allocation.freight_value(), dec!(175.50));
        assert_eq!(
            allocation.notes(),
            "created\nFreight changed from 0 to 150.00: carrier quote\nFreight changed from 150.00 to 175.50"
        );
    }

    #[test]
    fn test_negative_freight_value_is_rejected() {
        let ledger = ledger();
        let mut line = line(dec!(10));
        let id = ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(5)))
            .unwrap()
            .id();

        let allocation = line.allocation_mut(id).unwrap();
        let err = ledger
            .update_freight_value(allocation, dec!(-1), None)
            .unwrap_err();
        assert!(matches!(err, FreightError::InvalidArgument(_)));
        assert_eq!(allocation.freight_value(), Decimal::ZERO);
    }

    #[test]
    fn test_validate_batch_checks_each_request_against_current_state() {
        let ledger = ledger();
        let mut line = line(dec!(100));
        ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(60)))
            .unwrap();

        // Each fits on its own; together they exceed the 40 left.
        let requests = [
            BatchRequest::new(&line, dec!(30), None),
            BatchRequest::new(&line, dec!(30), None),
        ];
        let result = ledger.validate_batch(&requests);

        assert!(result.is_valid());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_batch_collects_every_failure() {
        let ledger = ledger();
        let line_a = line(dec!(10));
        let line_b = line(dec!(5));

        let requests = [
            BatchRequest::new(&line_a, dec!(20), None),
            BatchRequest::new(&line_b, dec!(0), Some(now() - Duration::days(1))),
            BatchRequest::new(&line_b, dec!(5), Some(now() + Duration::days(1))),
        ];
        let result = ledger.validate_batch(&requests);

        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors[0].starts_with(&format!("Line {}", line_a.id())));
        assert!(result.errors[0].contains("requested 20, available 10"));
        assert!(result.errors[1].starts_with(&format!("Line {}", line_b.id())));
        assert!(result.errors[1].contains("greater than 0"));
        assert!(result.errors[2].contains("in the past"));
    }

    #[test]
    fn test_summarize_aggregates_across_lines() {
        let ledger = ledger();
        let order_id = OrderId::new();
        let mut line_a =
            OrderLine::new(order_id, "A", dec!(100), dec!(1), dec!(0)).unwrap();
        let mut line_b =
            OrderLine::new(order_id, "B", dec!(100), dec!(1), dec!(0)).unwrap();
        let line_c = OrderLine::new(order_id, "C", dec!(100), dec!(1), dec!(0)).unwrap();

        let soon = now() + Duration::days(1);
        let later = now() + Duration::days(4);

        // 10 kg and 0.001 m³ per unit, priced at 1 per kg-km over 2 km
        let ten_kg_box = PackagingProfile::try_from(PackagingProfileData {
            height: dec!(10),
            width: dec!(10),
            length: dec!(10),
            nominal_weight: dec!(10),
            package_weight: dec!(10),
            minimum_quantity: 1,
            ..Default::default()
        })
        .unwrap();

        ledger
            .create_allocation(
                &mut line_a,
                AllocationRequest::new(dec!(5))
                    .scheduled_at(later)
                    .priced(ten_kg_box.clone(), dec!(2), FreightPricing::with_rate(dec!(1))),
            )
            .unwrap();
        ledger
            .create_allocation(
                &mut line_b,
                AllocationRequest::new(dec!(10))
                    .scheduled_at(soon)
                    .priced(ten_kg_box, dec!(2), FreightPricing::with_rate(dec!(1))),
            )
            .unwrap();

        let order = Order::from_lines(order_id, [line_a, line_b, line_c]).unwrap();
        let summary = ledger.summarize(&order).unwrap();

        assert_eq!(summary.line_count, 3);
        assert_eq!(summary.lines_with_allocations, 2);
        assert_eq!(summary.allocation_count, 2);
        assert_eq!(summary.scheduled_allocation_count, 2);
        assert_eq!(summary.total_weight, dec!(150));
        assert_eq!(summary.total_volume, dec!(0.015));
        assert_eq!(summary.freight_value_total, dec!(300));
        assert_eq!(summary.next_scheduled_at, Some(soon));
    }

    #[test]
    fn test_summarize_without_schedules() {
        let ledger = ledger();
        let order_id = OrderId::new();
        let mut line = OrderLine::new(order_id, "A", dec!(10), dec!(1), dec!(0)).unwrap();
        ledger
            .create_allocation(&mut line, AllocationRequest::new(dec!(1)))
            .unwrap();

        let summary = ledger
            .summarize(&Order::from_lines(order_id, [line]).unwrap())
            .unwrap();
        assert_eq!(summary.allocation_count, 1);
        assert_eq!(summary.scheduled_allocation_count, 0);
        assert_eq!(summary.next_scheduled_at, None);
        assert_eq!(summary.total_weight, Decimal::ZERO);
    }
}
