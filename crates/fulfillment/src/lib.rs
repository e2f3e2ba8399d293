//! Fulfillment service for order freight.
//!
//! Wraps the synchronous [`freight`] core with the collaborators it needs at
//! runtime: a product catalog for packaging profiles, a pricing policy for
//! default rates, a distance service for routes, and a versioned store for
//! order lines.
//!
//! Every write goes through [`OrderLineStore::save_line`] with the version
//! that was loaded, so two writers racing on the same line cannot both win.

pub mod commands;
pub mod config;
pub mod error;
pub mod service;
pub mod services;
pub mod store;

pub use commands::{
    BatchItem, QuoteBasket, QuoteFreight, RepriceShipment, RescheduleShipment, Route,
    ScheduleShipment,
};
pub use config::FreightConfig;
pub use error::{FulfillmentError, Result};
pub use service::FulfillmentService;
pub use services::{
    DistanceService, InMemoryDistanceService, InMemoryProductCatalog, PricingPolicy,
    ProductCatalog, StaticPricingPolicy,
};
pub use store::{InMemoryOrderLineStore, OrderLineStore, VersionedLine};
