//! Batch-processing errors.
//! Aggregates subsystem errors via `From` conversions.

use super::{InventoryError, StorageError, TaintError};

/// Errors surfaced by the per-database batch processor.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("taint error: {0}")]
    Taint(#[from] TaintError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
