//! Inventory-builder errors.

use super::StorageError;
use crate::types::ids::{QualId, ResourceId};
use crate::types::sim::SimId;

/// Errors that can occur while building the Inventories table.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The simulation already has derived rows. Recoverable: callers skip
    /// the simulation and continue.
    #[error("simulation {sim} is already post-processed")]
    AlreadyProcessed { sim: SimId },

    #[error("resource {resource} references missing parent {parent}")]
    MissingParent {
        resource: ResourceId,
        parent: ResourceId,
    },

    #[error("resource {resource} is created at {time} before its parent {parent} at {parent_time}")]
    ParentAfterChild {
        resource: ResourceId,
        time: i64,
        parent: ResourceId,
        parent_time: i64,
    },

    #[error("resource {resource} participates in a parent cycle")]
    CycleDetected { resource: ResourceId },

    #[error("composition {qual} mass fractions sum to {sum}")]
    CompositionSumDiverged { qual: QualId, sum: f64 },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl InventoryError {
    /// True for the non-fatal repeat-invocation condition.
    pub fn is_already_processed(&self) -> bool {
        matches!(self, Self::AlreadyProcessed { .. })
    }
}
