//! Pre-walk validation of one simulation's raw rows.
//!
//! Fatal findings: missing input tables, dangling or time-inverted parent
//! references, parent cycles, composition mass fractions diverging from 1.
//! Combine nodes that fail to conserve mass are logged, never fatal.

use lode_core::config::PostConfig;
use lode_core::errors::{InventoryError, StorageError};
use lode_core::types::collections::FxHashMap;
use lode_core::types::ids::ResourceId;
use lode_core::types::sim::SimId;
use lode_storage::queries::{compositions, resources};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

/// Input tables the walk reads directly. `AgentExit` is absent here
/// because `schema::prepare` bootstraps it when missing.
const REQUIRED_TABLES: &[&str] = &[
    "Info",
    "Resources",
    "ResCreators",
    "AgentEntry",
    "Transactions",
    "Compositions",
];

/// Verify the expected input tables exist.
pub fn require_tables(conn: &Connection) -> Result<(), StorageError> {
    for table in REQUIRED_TABLES {
        let found: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
        if found.is_none() {
            return Err(StorageError::SchemaMissing {
                what: (*table).to_string(),
            });
        }
    }
    Ok(())
}

/// Run every pre-walk check for one simulation.
pub fn check_sim(
    conn: &Connection,
    sim: SimId,
    config: &PostConfig,
) -> Result<(), InventoryError> {
    require_tables(conn)?;

    let rows = resources::all_for_sim(conn, sim)?;
    let by_id: FxHashMap<ResourceId, &resources::ResourceRow> =
        rows.iter().map(|r| (r.resource, r)).collect();

    for row in &rows {
        for parent in [row.parent1, row.parent2].into_iter().flatten() {
            if parent == row.resource {
                return Err(InventoryError::CycleDetected {
                    resource: row.resource,
                });
            }
            let parent_row = by_id.get(&parent).ok_or(InventoryError::MissingParent {
                resource: row.resource,
                parent,
            })?;
            if parent_row.time_created > row.time_created {
                return Err(InventoryError::ParentAfterChild {
                    resource: row.resource,
                    time: row.time_created,
                    parent,
                    parent_time: parent_row.time_created,
                });
            }
        }

        if let (Some(p1), Some(p2)) = (row.parent1, row.parent2) {
            let combined = by_id[&p1].quantity + by_id[&p2].quantity;
            if (row.quantity - combined).abs() > config.mass_tolerance {
                warn!(
                    resource = %row.resource,
                    child_quantity = row.quantity,
                    parent_quantity = combined,
                    "combine does not conserve mass"
                );
            }
        }
    }

    check_acyclic(&rows)?;

    for total in compositions::mass_fraction_sums(conn, sim)? {
        if (total.sum - 1.0).abs() > config.mass_tolerance {
            return Err(InventoryError::CompositionSumDiverged {
                qual: total.qual,
                sum: total.sum,
            });
        }
    }

    Ok(())
}

/// Reject any cycle in the parent graph. Strongly connected components
/// larger than one node are cycles; self-loops are caught by the caller.
fn check_acyclic(rows: &[resources::ResourceRow]) -> Result<(), InventoryError> {
    let mut graph = DiGraph::<ResourceId, ()>::new();
    let mut index: FxHashMap<ResourceId, NodeIndex> = FxHashMap::default();

    for row in rows {
        let idx = graph.add_node(row.resource);
        index.insert(row.resource, idx);
    }
    for row in rows {
        for parent in [row.parent1, row.parent2].into_iter().flatten() {
            if let Some(&from) = index.get(&parent) {
                graph.add_edge(from, index[&row.resource], ());
            }
        }
    }

    for scc in tarjan_scc(&graph) {
        if scc.len() > 1 {
            return Err(InventoryError::CycleDetected {
                resource: graph[scc[0]],
            });
        }
    }
    Ok(())
}
