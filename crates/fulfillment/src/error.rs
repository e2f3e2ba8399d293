//! Fulfillment error types.

use common::{AllocationId, OrderId, OrderLineId, ProductId, Version};
use freight::FreightError;
use thiserror::Error;

/// Errors that can occur while fulfilling orders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FulfillmentError {
    /// The freight core rejected the operation.
    #[error(transparent)]
    Freight(#[from] FreightError),

    /// No order line with this ID is stored.
    #[error("Order line not found: {0}")]
    LineNotFound(OrderLineId),

    /// No lines are stored for this order.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The line has no allocation with this ID.
    #[error("Allocation {allocation_id} not found on line {line_id}")]
    AllocationNotFound {
        line_id: OrderLineId,
        allocation_id: AllocationId,
    },

    /// The catalog has no packaging profile for the product.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The distance service knows no route between the two addresses.
    #[error("No distance known from '{origin}' to '{destination}'")]
    DistanceUnavailable { origin: String, destination: String },

    /// The stored line changed since it was loaded.
    #[error("Concurrency conflict on line {line_id}: expected version {expected}, actual {actual}")]
    ConcurrencyConflict {
        line_id: OrderLineId,
        expected: Version,
        actual: Version,
    },

    /// A line with this ID is already stored.
    #[error("Order line already exists: {0}")]
    DuplicateLine(OrderLineId),
}

/// Convenience type alias for fulfillment results.
pub type Result<T> = std::result::Result<T, FulfillmentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_freight_errors_keep_their_message() {
        let err: FulfillmentError = FreightError::InsufficientCapacity {
            requested: dec!(50),
            available: dec!(40),
        }
        .into();
        assert_eq!(err.to_string(), "Insufficient capacity: requested 50, available 40");
    }

    #[test]
    fn test_conflict_message() {
        let line_id = OrderLineId::new();
        let err = FulfillmentError::ConcurrencyConflict {
            line_id,
            expected: Version::new(1),
            actual: Version::new(2),
        };
        assert!(err.to_string().contains("expected version 1, actual 2"));
    }
}
