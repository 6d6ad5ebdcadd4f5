//! Agents table: the already-processed probe and the entry/exit join.

use lode_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use lode_core::types::sim::SimId;

/// Whether derived rows already exist for this simulation. Any Agents row
/// for the tag means a previous run committed.
pub fn is_processed(conn: &Connection, sim: SimId) -> Result<bool, StorageError> {
    let row: Option<i64> = conn
        .query_row(
            "SELECT AgentId FROM Agents WHERE SimId = ?1 LIMIT 1",
            params![sim],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    Ok(row.is_some())
}

/// Materialize the Agents table for one simulation: entry rows left-joined
/// with exit rows (missing exit stays NULL). Returns the row count.
pub fn materialize(conn: &Connection, sim: SimId) -> Result<usize, StorageError> {
    conn.execute(
        "INSERT INTO Agents
         SELECT n.SimId,n.AgentId,n.Kind,n.Spec,n.Prototype,n.ParentId,n.Lifetime,n.EnterTime,x.ExitTime
         FROM AgentEntry AS n
         LEFT JOIN AgentExit AS x ON n.AgentId = x.AgentId AND n.SimId = x.SimId
         WHERE n.SimId = ?1",
        params![sim],
    )
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}
