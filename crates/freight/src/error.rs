//! Freight engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the freight calculator and the allocation ledger.
///
/// All of them are the caller's to handle; the engine never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FreightError {
    /// An argument was out of range (non-positive quantity or distance,
    /// negative freight value, past-dated schedule, malformed packaging).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested quantity exceeds what is left to allocate on the line.
    #[error("Insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity {
        requested: Decimal,
        available: Decimal,
    },

    /// No freight rate was supplied and no default pricing is configured.
    #[error("No freight rate supplied and no default pricing policy configured")]
    MissingPricingPolicy,
}

impl FreightError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        FreightError::InvalidArgument(message.into())
    }
}

/// Multiplies two figures, failing instead of overflowing.
pub(crate) fn checked_mul(figure: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| FreightError::invalid(format!("{figure} out of range")))
}

/// Adds two figures, failing instead of overflowing.
pub(crate) fn checked_add(figure: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| FreightError::invalid(format!("{figure} out of range")))
}

/// Convenience type alias for freight results.
pub type Result<T> = std::result::Result<T, FreightError>;
