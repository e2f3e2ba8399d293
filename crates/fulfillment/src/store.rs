//! Versioned storage for order lines.

use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, OrderLineId, Version};
use freight::OrderLine;
use tokio::sync::RwLock;

use crate::error::{FulfillmentError, Result};

/// An order line together with the version it was stored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedLine {
    pub line: OrderLine,
    pub version: Version,
}

/// Storage for order lines with optimistic concurrency.
///
/// Every successful save bumps the line's version. A save carrying a stale
/// version fails with [`FulfillmentError::ConcurrencyConflict`] and leaves
/// the stored line untouched.
#[async_trait]
pub trait OrderLineStore: Send + Sync {
    /// Stores a new line at the initial version.
    async fn insert_line(&self, line: OrderLine) -> Result<Version>;

    /// Loads a line and the version it is stored at.
    async fn load_line(&self, line_id: OrderLineId) -> Result<VersionedLine>;

    /// Replaces a line if it is still at `expected`, returning the new version.
    async fn save_line(&self, line: OrderLine, expected: Version) -> Result<Version>;

    /// Returns all lines of an order in insertion order.
    async fn lines_for_order(&self, order_id: OrderId) -> Result<Vec<OrderLine>>;
}

/// In-memory order line store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderLineStore {
    lines: Arc<RwLock<Vec<VersionedLine>>>,
}

impl InMemoryOrderLineStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of lines stored.
    pub async fn line_count(&self) -> usize {
        self.lines.read().await.len()
    }
}

#[async_trait]
impl OrderLineStore for InMemoryOrderLineStore {
    async fn insert_line(&self, line: OrderLine) -> Result<Version> {
        let mut lines = self.lines.write().await;

        if lines.iter().any(|stored| stored.line.id() == line.id()) {
            return Err(FulfillmentError::DuplicateLine(line.id()));
        }

        let version = Version::initial();
        lines.push(VersionedLine { line, version });
        Ok(version)
    }

    async fn load_line(&self, line_id: OrderLineId) -> Result<VersionedLine> {
        self.lines
            .read()
            .await
            .iter()
            .find(|stored| stored.line.id() == line_id)
            .cloned()
            .ok_or(FulfillmentError::LineNotFound(line_id))
    }

    async fn save_line(&self, line: OrderLine, expected: Version) -> Result<Version> {
        let line_id = line.id();
        let mut lines = self.lines.write().await;

        let stored = lines
            .iter_mut()
            .find(|stored| stored.line.id() == line_id)
            .ok_or(FulfillmentError::LineNotFound(line_id))?;

        if stored.version != expected {
            return Err(FulfillmentError::ConcurrencyConflict {
                line_id,
                expected,
                actual: stored.version,
            });
        }

        stored.version = stored.version.next();
        stored.line = line;
        Ok(stored.version)
    }

    async fn lines_for_order(&self, order_id: OrderId) -> Result<Vec<OrderLine>> {
        Ok(self
            .lines
            .read()
            .await
            .iter()
            .filter(|stored| stored.line.order_id() == order_id)
            .map(|stored| stored.line.clone())
            .collect())
    }
}
