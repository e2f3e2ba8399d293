//! Order, order line and shipment allocation records.

mod allocation;
mod line;
mod state;

pub use allocation::ShipmentAllocation;
pub use line::OrderLine;
pub use state::AllocationStatus;

use common::{OrderId, OrderLineId};
use serde::{Deserialize, Serialize};

use crate::error::{FreightError, Result};

/// An order as seen by the freight engine: its id and its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    lines: Vec<OrderLine>,
}

impl Order {
    /// Creates an order with no lines.
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            lines: Vec::new(),
        }
    }

    /// Assembles an order from lines loaded elsewhere.
    ///
    /// Every line must belong to `id`.
    pub fn from_lines(id: OrderId, lines: impl IntoIterator<Item = OrderLine>) -> Result<Self> {
        let mut order = Self::new(id);
        for line in lines {
            order.add_line(line)?;
        }
        Ok(order)
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Adds a line to the order.
    pub fn add_line(&mut self, line: OrderLine) -> Result<()> {
        if line.order_id() != self.id {
            return Err(FreightError::invalid(format!(
                "line {} belongs to order {}, not {}",
                line.id(),
                line.order_id(),
                self.id
            )));
        }
        self.lines.push(line);
        Ok(())
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, line_id: OrderLineId) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.id() == line_id)
    }

    pub fn line_mut(&mut self, line_id: OrderLineId) -> Option<&mut OrderLine> {
        self.lines.iter_mut().find(|l| l.id() == line_id)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
