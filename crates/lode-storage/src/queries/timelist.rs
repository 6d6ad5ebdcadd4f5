//! TimeList table: one row per integer step of a simulation.

use lode_core::errors::StorageError;
use rusqlite::{params, Connection};

use lode_core::types::sim::SimId;

/// Insert one TimeList row for every t in `[0, duration)`.
pub fn populate(conn: &Connection, sim: SimId, duration: i64) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached("INSERT INTO TimeList VALUES (?1, ?2)")
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    for t in 0..duration {
        stmt.execute(params![sim, t])
            .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    }
    Ok(())
}
