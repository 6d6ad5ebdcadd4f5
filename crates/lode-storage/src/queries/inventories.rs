//! Inventories table: interval writes and the provenance join.

use lode_core::errors::StorageError;
use rusqlite::{params, Connection};

use lode_core::types::ids::{AgentId, QualId, ResourceId};
use lode_core::types::sim::SimId;

/// One emitted inventory interval: `resource` held by `agent` in state
/// `qual` at `quantity` for every t in `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub resource: ResourceId,
    pub agent: AgentId,
    pub start_time: i64,
    pub end_time: i64,
    pub qual: QualId,
    pub quantity: f64,
}

/// A Resources row joined with its inventory intervals, feeding the
/// provenance tree. `interval_start` and `agent` are NULL for resource
/// states that never appear in Inventories (zero-width lifetimes).
#[derive(Debug, Clone)]
pub struct ProvenanceRow {
    pub resource: ResourceId,
    pub time_created: i64,
    pub interval_start: Option<i64>,
    pub quantity: f64,
    pub qual: QualId,
    pub parent1: Option<ResourceId>,
    pub parent2: Option<ResourceId>,
    pub agent: Option<AgentId>,
}

/// Insert a batch of inventory intervals. Returns the row count.
pub fn insert_batch(
    conn: &Connection,
    sim: SimId,
    rows: &[InventoryRow],
) -> Result<usize, StorageError> {
    let mut stmt = conn
        .prepare_cached("INSERT INTO Inventories VALUES (?1,?2,?3,?4,?5,?6,?7)")
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut count = 0;
    for row in rows {
        stmt.execute(params![
            sim,
            row.resource,
            row.agent,
            row.start_time,
            row.end_time,
            row.qual,
            row.quantity,
        ])
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
        count += 1;
    }
    Ok(count)
}

/// All intervals for one simulation in insertion order (used by tests and
/// determinism checks).
pub fn intervals_for_sim(
    conn: &Connection,
    sim: SimId,
) -> Result<Vec<InventoryRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT ResourceId,AgentId,StartTime,EndTime,QualId,Quantity
             FROM Inventories WHERE SimId = ?1 ORDER BY rowid",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![sim], |row| {
            Ok(InventoryRow {
                resource: row.get(0)?,
                agent: row.get(1)?,
                start_time: row.get(2)?,
                end_time: row.get(3)?,
                qual: row.get(4)?,
                quantity: row.get(5)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Inventories".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

/// Resource states joined with their inventory intervals, ordered by
/// `(ResourceId, TimeCreated, StartTime)`. Input to the provenance tree.
pub fn provenance_rows(
    conn: &Connection,
    sim: SimId,
) -> Result<Vec<ProvenanceRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT r.ResourceId,r.TimeCreated,inv.StartTime,r.Quantity,r.QualId,
                    r.Parent1,r.Parent2,inv.AgentId
             FROM Resources AS r
             LEFT JOIN Inventories AS inv
                 ON inv.SimId = r.SimId AND inv.ResourceId = r.ResourceId
             WHERE r.SimId = ?1
             ORDER BY r.ResourceId, r.TimeCreated, inv.StartTime",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![sim], |row| {
            let parent1: Option<i64> = row.get(5)?;
            let parent2: Option<i64> = row.get(6)?;
            Ok(ProvenanceRow {
                resource: row.get(0)?,
                time_created: row.get(1)?,
                interval_start: row.get(2)?,
                quantity: row.get(3)?,
                qual: row.get(4)?,
                parent1: parent1.filter(|&p| p != 0).map(ResourceId::new),
                parent2: parent2.filter(|&p| p != 0).map(ResourceId::new),
                agent: row.get(7)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Inventories".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}
