//! Provenance-taint analysis.
//!
//! [`tree`] builds a time-sorted, richly linked arena over resource
//! states and their inventory intervals; [`analyzer`] marks the subgraph
//! reachable from a distinguished node, propagates mass-weighted taint
//! fractions, and aggregates per-agent time series.

pub mod analyzer;
pub mod tree;

use lode_core::errors::TaintError;
use lode_core::types::collections::FxHashMap;
use lode_core::types::ids::{AgentId, ResourceId};
use lode_core::types::sim::SimId;
use lode_storage::queries::{info, inventories};
use rusqlite::Connection;

use analyzer::TaintVal;
use tree::ProvTree;

/// Per-agent taint/quantity time series for the subgraph descending from
/// `resource`, over `[0, tmax)`. A `tmax` of -1 means end-of-simulation
/// and is resolved against the Info table.
pub fn taint_series(
    conn: &Connection,
    sim: SimId,
    resource: ResourceId,
    tmax: i64,
) -> Result<FxHashMap<AgentId, Vec<TaintVal>>, TaintError> {
    let tmax = info::resolve_end_time(conn, sim, tmax)?;
    let rows = inventories::provenance_rows(conn, sim)?;
    let tree = ProvTree::from_rows(rows)?;
    let start = tree
        .locate(resource)
        .ok_or(TaintError::ResourceNotFound { resource })?;
    Ok(analyzer::taint_from(&tree, start, tmax))
}
