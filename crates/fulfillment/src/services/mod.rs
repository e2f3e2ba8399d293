//! Collaborator traits and in-memory implementations for the fulfillment service.

pub mod catalog;
pub mod distance;
pub mod pricing;

pub use catalog::{InMemoryProductCatalog, ProductCatalog};
pub use distance::{DistanceService, InMemoryDistanceService};
pub use pricing::{PricingPolicy, StaticPricingPolicy};
