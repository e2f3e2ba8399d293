//! Shared identifier and version types used across the freight workspace.

pub mod ids;
pub mod version;

pub use ids::{AllocationId, OrderId, OrderLineId, ProductId};
pub use version::Version;
