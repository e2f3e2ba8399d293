//! Shipment allocation lifecycle.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a shipment allocation.
///
/// State transitions:
/// ```text
/// Created ──► Scheduled ──► Rescheduled ─┐
///                                  ▲     │
///                                  └─────┘
/// ```
/// There is no terminal state: allocations are never cancelled or deleted
/// and keep counting toward the line's consumed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AllocationStatus {
    /// Created without a shipping date.
    #[default]
    Created,

    /// A shipping date has been set once.
    Scheduled,

    /// The shipping date has been moved at least once.
    Rescheduled,
}

impl AllocationStatus {
    /// Returns the initial status for an allocation created with or without
    /// a shipping date.
    pub fn initial(scheduled: bool) -> Self {
        if scheduled {
            AllocationStatus::Scheduled
        } else {
            AllocationStatus::Created
        }
    }

    /// Returns the status after a new shipping date is set.
    pub fn after_reschedule(&self) -> Self {
        match self {
            AllocationStatus::Created => AllocationStatus::Scheduled,
            AllocationStatus::Scheduled | AllocationStatus::Rescheduled => {
                AllocationStatus::Rescheduled
            }
        }
    }

    /// Returns true if a shipping date is set in this state.
    pub fn is_scheduled(&self) -> bool {
        !matches!(self, AllocationStatus::Created)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::Created => "Created",
            AllocationStatus::Scheduled => "Scheduled",
            AllocationStatus::Rescheduled => "Rescheduled",
        }
    }
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
