//! Compositions table queries.

use lode_core::errors::StorageError;
use rusqlite::{params, Connection};

use lode_core::types::ids::{NucId, QualId};
use lode_core::types::sim::SimId;

/// One nuclide's share of a composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionRow {
    pub qual: QualId,
    pub nuc: NucId,
    pub mass_frac: f64,
}

/// Per-composition sum of mass fractions, for the sums-to-one check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionSum {
    pub qual: QualId,
    pub sum: f64,
}

/// Every composition entry for one simulation.
pub fn all_for_sim(conn: &Connection, sim: SimId) -> Result<Vec<CompositionRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT QualId,NucId,MassFrac FROM Compositions
             WHERE SimId = ?1 ORDER BY QualId, NucId",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![sim], |row| {
            Ok(CompositionRow {
                qual: row.get(0)?,
                nuc: row.get(1)?,
                mass_frac: row.get(2)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Compositions".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

/// Mass-fraction totals grouped by composition id.
pub fn mass_fraction_sums(
    conn: &Connection,
    sim: SimId,
) -> Result<Vec<CompositionSum>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT QualId, SUM(MassFrac) FROM Compositions
             WHERE SimId = ?1 GROUP BY QualId ORDER BY QualId",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map(params![sim], |row| {
            Ok(CompositionSum {
                qual: row.get(0)?,
                sum: row.get(1)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::RowScanFailure {
            table: "Compositions".to_string(),
            message: e.to_string(),
        })?);
    }
    Ok(result)
}
