//! Storage-layer errors for SQLite operations.

use crate::types::sim::SimId;

/// Errors raised by the tabular store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("expected table or column missing: {what}")]
    SchemaMissing { what: String },

    #[error("failed to decode row from {table}: {message}")]
    RowScanFailure { table: String, message: String },

    #[error("no Info row for simulation {sim}")]
    UnknownSimulation { sim: SimId },
}
