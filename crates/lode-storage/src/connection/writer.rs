//! Write transaction helper: BEGIN IMMEDIATE, rollback on drop.

use lode_core::errors::StorageError;
use rusqlite::Connection;

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// Acquires the write lock at transaction start, preventing SQLITE_BUSY.
/// If `f` returns an error the transaction rolls back on drop, leaving no
/// partial derived data.
pub fn with_immediate_transaction<F, T, E>(conn: &Connection, f: F) -> Result<T, E>
where
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, E>,
    E: From<StorageError>,
{
    let tx = rusqlite::Transaction::new_unchecked(conn, rusqlite::TransactionBehavior::Immediate)
        .map_err(|e| StorageError::SqliteError {
            message: format!("failed to begin immediate transaction: {e}"),
        })?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}
