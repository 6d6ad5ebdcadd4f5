//! Transactions table queries: ownership-change events.

use lode_core::errors::StorageError;
use rusqlite::{params, Connection};

use lode_core::types::ids::{AgentId, ResourceId};
use lode_core::types::sim::SimId;

/// One ownership change: the receiving agent and the step it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerChange {
    pub receiver: AgentId,
    pub time: i64,
}

/// All ownership changes for a resource, ascending by time with the
/// transfer row id as tie-break so repeated runs see the same order.
pub fn owner_changes(
    conn: &Connection,
    sim: SimId,
    resource: ResourceId,
) -> Result<Vec<OwnerChange>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT tr.ReceiverId, tr.Time FROM Transactions AS tr
             WHERE tr.ResourceId = ?1 AND tr.SimId = ?2
             ORDER BY tr.Time ASC, tr.TransactionId ASC",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![resource, sim], |row| {
            Ok(OwnerChange {
                receiver: row.get(0)?,
                time: row.get(1)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Transactions".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}
