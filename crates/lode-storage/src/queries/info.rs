//! Info table queries: simulation tags and durations.

use lode_core::errors::StorageError;
use rusqlite::{params, Connection};

use lode_core::types::sim::SimId;

/// One simulation's header row.
#[derive(Debug, Clone)]
pub struct SimInfo {
    pub sim: SimId,
    pub duration: i64,
    pub decay_interval: Option<i64>,
}

/// List every simulation tag in the database.
pub fn sim_ids(conn: &Connection) -> Result<Vec<SimId>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT SimId FROM Info")
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map([], |row| row.get::<_, SimId>(0))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Info".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

/// Header row for one simulation.
pub fn sim_info(conn: &Connection, sim: SimId) -> Result<SimInfo, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT Duration,DecayInterval FROM Info WHERE SimId = ?1")
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    stmt.query_row(params![sim], |row| {
        Ok(SimInfo {
            sim,
            duration: row.get(0)?,
            decay_interval: row.get(1)?,
        })
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StorageError::UnknownSimulation { sim },
        other => StorageError::RowScanFailure {
            table: "Info".to_string(),
            message: other.to_string(),
        },
    })
}

/// Duration for one simulation, resolving the caller-facing `-1` sentinel
/// ("end of simulation") when present.
pub fn resolve_end_time(conn: &Connection, sim: SimId, t: i64) -> Result<i64, StorageError> {
    if t >= 0 {
        return Ok(t);
    }
    Ok(sim_info(conn, sim)?.duration)
}
