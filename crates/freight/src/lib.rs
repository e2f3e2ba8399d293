//! Order-fulfillment freight engine.
//!
//! This crate provides the synchronous core of shipment planning:
//! - [`PackagingProfile`] turns packaging geometry into per-unit weight and volume
//! - [`FreightCalculator`] prices a line item or a basket under the product's
//!   [`WeightPolicy`]
//! - [`AllocationLedger`] schedules partial shipments against an [`OrderLine`]
//!   without ever allocating more than was ordered
//!
//! Nothing here performs I/O. Callers that share order lines between
//! concurrent users must give each ledger call exclusive access to the line.

pub mod calculator;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod order;
pub mod packaging;

pub use calculator::{
    ConsolidatedFreightResult, FreightCalculator, FreightComputationResult, FreightPricing,
    PricingDefaults,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{FreightError, Result};
pub use ledger::{
    AllocationLedger, AllocationRequest, BatchRequest, BatchValidation, FreightBasis,
    TransportSummary,
};
pub use order::{AllocationStatus, Order, OrderLine, ShipmentAllocation};
pub use packaging::{
    PackagingProfile, PackagingProfileData, ProductClassification, UnitKind, WeightPolicy,
};
