//! Order-level transport summary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, checked_add};
use crate::order::Order;

/// Order-level transport figures across every line and allocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransportSummary {
    pub line_count: usize,
    pub lines_with_allocations: usize,
    pub allocation_count: usize,
    pub scheduled_allocation_count: usize,
    pub total_weight: Decimal,
    pub total_volume: Decimal,
    pub freight_value_total: Decimal,
    /// Earliest shipping date still ahead of `now`.
    pub next_scheduled_at: Option<DateTime<Utc>>,
}

impl TransportSummary {
    pub(crate) fn from_order(order: &Order, now: DateTime<Utc>) -> Result<Self> {
        let mut summary = TransportSummary {
            line_count: order.line_count(),
            ..Default::default()
        };

        for line in order.lines() {
            if line.has_shipments() {
                summary.lines_with_allocations += 1;
            }

            for allocation in line.shipments() {
                summary.allocation_count += 1;
                summary.total_weight = checked_add(
                    "total weight",
                    summary.total_weight,
                    allocation.total_weight().unwrap_or(Decimal::ZERO),
                )?;
                summary.total_volume = checked_add(
                    "total volume",
                    summary.total_volume,
                    allocation.total_volume().unwrap_or(Decimal::ZERO),
                )?;
                summary.freight_value_total = checked_add(
                    "freight total",
                    summary.freight_value_total,
                    allocation.freight_value(),
                )?;

                if let Some(at) = allocation.scheduled_at() {
                    summary.scheduled_allocation_count += 1;
                    if at > now && summary.next_scheduled_at.is_none_or(|next| at < next) {
                        summary.next_scheduled_at = Some(at);
                    }
                }
            }
        }

        Ok(summary)
    }
}
