//! Resources table queries, including the transient per-simulation walk
//! table used to answer "children of" efficiently.

use lode_core::errors::StorageError;
use rusqlite::{params, Connection};

use lode_core::types::collections::SmallVec2;
use lode_core::types::ids::{AgentId, QualId, ResourceId};
use lode_core::types::sim::SimId;

use crate::schema::index_sql;

/// A resource state as recorded by the simulator.
#[derive(Debug, Clone)]
pub struct ResourceRow {
    pub resource: ResourceId,
    pub time_created: i64,
    pub qual: QualId,
    pub quantity: f64,
    pub parent1: Option<ResourceId>,
    pub parent2: Option<ResourceId>,
}

/// A root resource joined with its creator agent.
#[derive(Debug, Clone)]
pub struct RootRow {
    pub resource: ResourceId,
    pub time_created: i64,
    pub creator: AgentId,
    pub qual: QualId,
    pub quantity: f64,
}

/// A child row returned from the walk table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRow {
    pub resource: ResourceId,
    pub time_created: i64,
    pub qual: QualId,
    pub quantity: f64,
}

/// The simulator writes 0 or NULL for "no parent"; both decode to `None`.
fn parent_from_raw(raw: Option<i64>) -> Option<ResourceId> {
    match raw {
        None | Some(0) => None,
        Some(p) => Some(ResourceId::new(p)),
    }
}

/// Every resource row for one simulation, ordered by resource id.
pub fn all_for_sim(conn: &Connection, sim: SimId) -> Result<Vec<ResourceRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT ResourceId,TimeCreated,QualId,Quantity,Parent1,Parent2
             FROM Resources WHERE SimId = ?1 ORDER BY ResourceId",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![sim], |row| {
            Ok(ResourceRow {
                resource: row.get(0)?,
                time_created: row.get(1)?,
                qual: row.get(2)?,
                quantity: row.get(3)?,
                parent1: parent_from_raw(row.get(4)?),
                parent2: parent_from_raw(row.get(5)?),
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Resources".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

/// Root resources (those with a creator record), ordered by resource id
/// so walk order is deterministic.
pub fn roots(conn: &Connection, sim: SimId) -> Result<Vec<RootRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT res.ResourceId,res.TimeCreated,rc.AgentId,res.QualId,res.Quantity
             FROM Resources AS res
             INNER JOIN ResCreators AS rc ON res.ResourceId = rc.ResourceId
             WHERE res.SimId = ?1 AND rc.SimId = ?1
             ORDER BY res.ResourceId",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![sim], |row| {
            Ok(RootRow {
                resource: row.get(0)?,
                time_created: row.get(1)?,
                creator: row.get(2)?,
                qual: row.get(3)?,
                quantity: row.get(4)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Resources".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

/// Name of the transient walk table for one simulation. Includes the hex
/// tag so concurrent runs on different simulations cannot collide.
pub fn walk_table_name(sim: SimId) -> String {
    format!("tmp_restbl_{sim}")
}

/// Create the walk table: the simulation's resource rows without the tag
/// column, indexed on both parent columns. Returns the table name.
pub fn create_walk_table(conn: &Connection, sim: SimId) -> Result<String, StorageError> {
    let table = walk_table_name(sim);

    conn.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    conn.execute(
        &format!(
            "CREATE TABLE {table} AS
             SELECT ResourceId,TimeCreated,Parent1,Parent2,QualId,Quantity
             FROM Resources WHERE SimId = ?1"
        ),
        params![sim],
    )
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    for col in ["Parent1", "Parent2"] {
        conn.execute_batch(&index_sql(&table, &[col]))
            .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    }

    Ok(table)
}

/// Drop the walk table after the walk completes.
pub fn drop_walk_table(conn: &Connection, table: &str) -> Result<(), StorageError> {
    conn.execute_batch(&format!("DROP TABLE {table};"))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

/// Children of a resource: any walk-table row naming it as either parent.
/// At most two exist; returned in ascending `(TimeCreated, ResourceId)`
/// order so the walk's tie-breaking is deterministic.
pub fn children(
    conn: &Connection,
    table: &str,
    resource: ResourceId,
) -> Result<SmallVec2<ChildRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT ResourceId,TimeCreated,QualId,Quantity FROM {table}
             WHERE Parent1 = ?1 OR Parent2 = ?1
             ORDER BY TimeCreated, ResourceId"
        ))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![resource], |row| {
            Ok(ChildRow {
                resource: row.get(0)?,
                time_created: row.get(1)?,
                qual: row.get(2)?,
                quantity: row.get(3)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = SmallVec2::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: table.to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}
