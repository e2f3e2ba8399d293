//! Fulfillment service orchestrating the freight core and its collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use common::{AllocationId, OrderId, OrderLineId, ProductId, Version};
use freight::{
    AllocationLedger, AllocationRequest, BatchRequest, BatchValidation, Clock,
    ConsolidatedFreightResult, FreightBasis, FreightCalculator, FreightComputationResult,
    FreightPricing, Order, OrderLine, ShipmentAllocation, TransportSummary,
};
use rust_decimal::Decimal;

use crate::commands::{
    BatchItem, QuoteBasket, QuoteFreight, RepriceShipment, RescheduleShipment, Route,
    ScheduleShipment,
};
use crate::error::{FulfillmentError, Result};
use crate::services::{DistanceService, PricingPolicy, ProductCatalog};
use crate::store::{OrderLineStore, VersionedLine};

/// Application service for quoting and scheduling shipments.
///
/// Every write loads the line with its version, runs the ledger on a private
/// copy and saves it back against the loaded version. A writer that lost a
/// race gets [`FulfillmentError::ConcurrencyConflict`] and nothing is stored.
pub struct FulfillmentService<S, C, P, D>
where
    S: OrderLineStore,
    C: ProductCatalog,
    P: PricingPolicy,
    D: DistanceService,
{
    store: S,
    catalog: C,
    pricing: P,
    distance: D,
    ledger: AllocationLedger,
}

impl<S, C, P, D> FulfillmentService<S, C, P, D>
where
    S: OrderLineStore,
    C: ProductCatalog,
    P: PricingPolicy,
    D: DistanceService,
{
    /// Creates a new fulfillment service using the system clock.
    pub fn new(store: S, catalog: C, pricing: P, distance: D) -> Self {
        Self::from_ledger(
            store,
            catalog,
            pricing,
            distance,
            AllocationLedger::new(FreightCalculator::new()),
        )
    }

    /// Creates a new fulfillment service reading time from `clock`.
    pub fn with_clock(store: S, catalog: C, pricing: P, distance: D, clock: Arc<dyn Clock>) -> Self {
        Self::from_ledger(
            store,
            catalog,
            pricing,
            distance,
            AllocationLedger::with_clock(FreightCalculator::new(), clock),
        )
    }

    fn from_ledger(store: S, catalog: C, pricing: P, distance: D, ledger: AllocationLedger) -> Self {
        Self {
            store,
            catalog,
            pricing,
            distance,
            ledger,
        }
    }

    pub fn ledger(&self) -> &AllocationLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a new order line.
    #[tracing::instrument(skip(self, line), fields(line_id = %line.id(), order_id = %line.order_id()))]
    pub async fn register_line(&self, line: OrderLine) -> Result<Version> {
        let version = self.store.insert_line(line).await?;
        tracing::info!("order line registered");
        Ok(version)
    }

    /// Returns the quantity of a line not yet allocated to any shipment.
    pub async fn available_quantity(&self, line_id: OrderLineId) -> Result<Decimal> {
        let stored = self.store.load_line(line_id).await?;
        Ok(self.ledger.available_quantity(&stored.line))
    }

    /// Prices a product without allocating anything.
    #[tracing::instrument(skip(self))]
    pub async fn quote(&self, command: QuoteFreight) -> Result<FreightComputationResult> {
        let profile = self.catalog.packaging_profile(&command.product_id).await?;
        let distance_km = self.resolve_route(&command.route).await?;
        let pricing = self
            .effective_pricing(&command.product_id, command.pricing)
            .await?;

        let result = self.ledger.calculator().calculate_freight(
            &profile,
            command.quantity,
            distance_km,
            &pricing,
        )?;

        metrics::counter!("freight_quotes_total").increment(1);
        tracing::info!(freight_value = %result.freight_value, "freight quoted");
        Ok(result)
    }

    /// Prices several products shipped together over one route.
    ///
    /// Defaults come from the pricing policy of the first product.
    #[tracing::instrument(skip(self))]
    pub async fn quote_basket(&self, command: QuoteBasket) -> Result<ConsolidatedFreightResult> {
        let mut items = Vec::with_capacity(command.items.len());
        for (product_id, quantity) in &command.items {
            let profile = self.catalog.packaging_profile(product_id).await?;
            items.push((profile, *quantity));
        }

        let distance_km = self.resolve_route(&command.route).await?;
        let pricing = match command.items.first() {
            Some((product_id, _)) => self.effective_pricing(product_id, command.pricing).await?,
            None => command.pricing.unwrap_or_default(),
        };

        let result = self
            .ledger
            .calculator()
            .calculate_consolidated_freight(&items, distance_km, &pricing)?;

        metrics::counter!("freight_quotes_total").increment(1);
        tracing::info!(
            items = result.item_count(),
            freight_value = %result.item_freight_total(),
            "basket quoted"
        );
        Ok(result)
    }

    /// Allocates part of an order line to a new shipment.
    ///
    /// The shipment is priced when a distance is known, either given or
    /// looked up from both addresses, and a rate is available from the
    /// command or the pricing policy. Otherwise its freight stays at zero.
    #[tracing::instrument(skip(self))]
    pub async fn schedule_shipment(&self, command: ScheduleShipment) -> Result<ShipmentAllocation> {
        let VersionedLine { mut line, version } = self.store.load_line(command.line_id).await?;

        let freight = self.freight_basis(&line, &command).await?;
        let request = AllocationRequest {
            quantity: command.quantity,
            scheduled_at: command.scheduled_at,
            origin_address: command.origin_address,
            destination_address: command.destination_address,
            freight,
            notes: command.notes,
        };

        let allocation = match self.ledger.create_allocation(&mut line, request) {
            Ok(allocation) => allocation,
            Err(e) => {
                metrics::counter!("shipment_allocations_rejected_total").increment(1);
                return Err(e.into());
            }
        };

        let version = self.save(line, version).await?;
        metrics::counter!("shipment_allocations_created_total").increment(1);
        tracing::info!(
            allocation_id = %allocation.id(),
            quantity = %allocation.quantity(),
            freight_value = %allocation.freight_value(),
            %version,
            "shipment allocation created"
        );
        Ok(allocation)
    }

    /// Moves an existing shipment to a new date.
    #[tracing::instrument(skip(self))]
    pub async fn reschedule_shipment(
        &self,
        command: RescheduleShipment,
    ) -> Result<ShipmentAllocation> {
        let updated = self
            .update_allocation(command.line_id, command.allocation_id, |ledger, allocation| {
                ledger.reschedule(allocation, command.new_scheduled_at, command.note.as_deref())
            })
            .await?;

        metrics::counter!("shipment_reschedules_total").increment(1);
        tracing::info!(
            allocation_id = %updated.id(),
            status = %updated.status(),
            "shipment allocation rescheduled"
        );
        Ok(updated)
    }

    /// Overrides the freight charge of an existing shipment.
    #[tracing::instrument(skip(self))]
    pub async fn reprice_shipment(&self, command: RepriceShipment) -> Result<ShipmentAllocation> {
        let updated = self
            .update_allocation(command.line_id, command.allocation_id, |ledger, allocation| {
                ledger.update_freight_value(allocation, command.new_value, command.reason.as_deref())
            })
            .await?;

        metrics::counter!("shipment_reprices_total").increment(1);
        tracing::info!(
            allocation_id = %updated.id(),
            freight_value = %updated.freight_value(),
            "shipment freight updated"
        );
        Ok(updated)
    }

    /// Checks a set of prospective shipments without allocating any.
    ///
    /// Each line is loaded once. Problems are reported in item order, with
    /// lines that do not exist reported where they appear.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn validate_batch(&self, items: Vec<BatchItem>) -> Result<BatchValidation> {
        let mut lines: HashMap<OrderLineId, Option<OrderLine>> = HashMap::new();
        for item in &items {
            if lines.contains_key(&item.line_id) {
                continue;
            }
            let line = match self.store.load_line(item.line_id).await {
                Ok(stored) => Some(stored.line),
                Err(FulfillmentError::LineNotFound(_)) => None,
                Err(e) => return Err(e),
            };
            lines.insert(item.line_id, line);
        }

        let mut errors = Vec::new();
        for item in &items {
            match lines.get(&item.line_id).and_then(Option::as_ref) {
                Some(line) => {
                    let request = BatchRequest::new(line, item.quantity, item.scheduled_at);
                    errors.extend(self.ledger.validate_batch(&[request]).errors);
                }
                None => errors.push(format!("Line {}: order line not found", item.line_id)),
            }
        }

        Ok(BatchValidation::from_errors(errors))
    }

    /// Loads every stored line of an order.
    pub async fn load_order(&self, order_id: OrderId) -> Result<Order> {
        let lines = self.store.lines_for_order(order_id).await?;
        if lines.is_empty() {
            return Err(FulfillmentError::OrderNotFound(order_id));
        }
        Ok(Order::from_lines(order_id, lines)?)
    }

    /// Aggregates transport figures across an order.
    #[tracing::instrument(skip(self))]
    pub async fn summarize_order(&self, order_id: OrderId) -> Result<TransportSummary> {
        let order = self.load_order(order_id).await?;
        Ok(self.ledger.summarize(&order)?)
    }

    async fn resolve_route(&self, route: &Route) -> Result<Decimal> {
        match route {
            Route::Distance(distance_km) => Ok(*distance_km),
            Route::Addresses {
                origin,
                destination,
            } => self.distance.distance_km(origin, destination).await,
        }
    }

    async fn effective_pricing(
        &self,
        product_id: &ProductId,
        explicit: Option<FreightPricing>,
    ) -> Result<FreightPricing> {
        let defaults = self.pricing.default_pricing(product_id).await?;
        Ok(explicit.unwrap_or_default().or_defaults(defaults.as_ref()))
    }

    async fn freight_basis(
        &self,
        line: &OrderLine,
        command: &ScheduleShipment,
    ) -> Result<Option<FreightBasis>> {
        let pricing = self
            .effective_pricing(line.product_id(), command.pricing)
            .await?;
        if !pricing.has_rate() && command.pricing.is_none() {
            return Ok(None);
        }

        let distance_km = match (
            command.distance_km,
            command.origin_address.as_deref(),
            command.destination_address.as_deref(),
        ) {
            (Some(distance_km), _, _) => distance_km,
            (None, Some(origin), Some(destination)) => {
                self.distance.distance_km(origin, destination).await?
            }
            _ => return Ok(None),
        };

        let profile = self.catalog.packaging_profile(line.product_id()).await?;
        Ok(Some(FreightBasis {
            profile,
            distance_km,
            pricing,
        }))
    }

    async fn update_allocation<F>(
        &self,
        line_id: OrderLineId,
        allocation_id: AllocationId,
        apply: F,
    ) -> Result<ShipmentAllocation>
    where
        F: FnOnce(&AllocationLedger, &mut ShipmentAllocation) -> freight::Result<()> + Send,
    {
        let VersionedLine { mut line, version } = self.store.load_line(line_id).await?;

        let allocation = line
            .allocation_mut(allocation_id)
            .ok_or(FulfillmentError::AllocationNotFound {
                line_id,
                allocation_id,
            })?;
        apply(&self.ledger, allocation)?;
        let updated = allocation.clone();

        self.save(line, version).await?;
        Ok(updated)
    }

    async fn save(&self, line: OrderLine, expected: Version) -> Result<Version> {
        let line_id = line.id();
        match self.store.save_line(line, expected).await {
            Ok(version) => Ok(version),
            Err(e @ FulfillmentError::ConcurrencyConflict { .. }) => {
                tracing::warn!(%line_id, %expected, "order line changed concurrently");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
