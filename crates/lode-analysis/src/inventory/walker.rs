//! The inventory walk: a depth-first descent of the resource-provenance
//! DAG that emits one ownership interval per (resource, holder) span.
//!
//! Everything a run writes (Agents, TimeList, the walk table, the
//! inventory intervals) happens inside a single immediate transaction,
//! so an aborted run leaves no derived rows.

use lode_core::config::PostConfig;
use lode_core::errors::InventoryError;
use lode_core::types::collections::FxHashSet;
use lode_core::types::ids::{AgentId, QualId, ResourceId};
use lode_core::types::sim::{SimId, END_OF_TIME};
use lode_storage::queries::inventories::InventoryRow;
use lode_storage::queries::{agents, info, inventories, resources, timelist, transactions};
use lode_storage::{with_immediate_transaction, Database};
use rusqlite::Connection;
use tracing::{debug, info};

use super::validate;

/// A resource state on the walk stack: where it starts and who holds it.
struct WalkNode {
    resource: ResourceId,
    owner: AgentId,
    start_time: i64,
    qual: QualId,
    quantity: f64,
}

/// Mutable walk bookkeeping, reset per simulation.
struct WalkState {
    table: String,
    visited: FxHashSet<ResourceId>,
    buffer: Vec<InventoryRow>,
    res_count: usize,
    rows_written: usize,
}

impl WalkState {
    /// Buffer an interval, dropping zero-width spans.
    fn push(&mut self, row: InventoryRow) {
        if row.end_time > row.start_time {
            self.buffer.push(row);
        }
    }
}

/// Builds the Inventories table for one simulation.
pub struct InventoryWalker<'a> {
    conn: &'a Connection,
    sim: SimId,
    config: &'a PostConfig,
}

impl<'a> InventoryWalker<'a> {
    pub fn new(db: &'a Database, sim: SimId, config: &'a PostConfig) -> Self {
        Self {
            conn: db.conn(),
            sim,
            config,
        }
    }

    /// Validate, then walk and commit. Returns `AlreadyProcessed` without
    /// writing anything when derived rows exist for this simulation.
    pub fn run(&self) -> Result<(), InventoryError> {
        if agents::is_processed(self.conn, self.sim)? {
            return Err(InventoryError::AlreadyProcessed { sim: self.sim });
        }

        validate::check_sim(self.conn, self.sim, self.config)?;

        with_immediate_transaction(self.conn, |tx| self.walk_all(tx))
    }

    fn walk_all(&self, conn: &Connection) -> Result<(), InventoryError> {
        info!(sim = %self.sim, "building inventories");

        let agent_rows = agents::materialize(conn, self.sim)?;
        let header = info::sim_info(conn, self.sim)?;
        timelist::populate(conn, self.sim, header.duration)?;
        debug!(agents = agent_rows, duration = header.duration, "materialized agents and time list");

        let table = resources::create_walk_table(conn, self.sim)?;
        let roots = resources::roots(conn, self.sim)?;
        info!(roots = roots.len(), "retrieved root resource nodes");

        let mut state = WalkState {
            table,
            visited: FxHashSet::default(),
            buffer: Vec::with_capacity(self.config.dump_freq.min(10_000)),
            res_count: 0,
            rows_written: 0,
        };

        for root in roots {
            self.walk_down(
                conn,
                &mut state,
                WalkNode {
                    resource: root.resource,
                    owner: root.creator,
                    start_time: root.time_created,
                    qual: root.qual,
                    quantity: root.quantity,
                },
            )?;
        }

        resources::drop_walk_table(conn, &state.table)?;
        self.flush(conn, &mut state)?;
        info!(resources = state.res_count, rows = state.rows_written, "inventory walk complete");

        Ok(())
    }

    /// Depth-first descent from one root. An explicit stack keeps the
    /// walk safe on DAGs deeper than the thread stack allows; children
    /// are pushed in reverse sorted order so emission order matches a
    /// recursive first-child-first walk.
    fn walk_down(
        &self,
        conn: &Connection,
        state: &mut WalkState,
        root: WalkNode,
    ) -> Result<(), InventoryError> {
        let mut stack: Vec<WalkNode> = vec![root];

        while let Some(node) = stack.pop() {
            // A resource with two parents is reached twice; the second
            // visit is a no-op.
            if !state.visited.insert(node.resource) {
                continue;
            }

            state.res_count += 1;
            if state.res_count % self.config.dump_freq == 0 {
                self.flush(conn, state)?;
            }

            let kids = resources::children(conn, &state.table, node.resource)?;
            let tentative_end = kids
                .first()
                .map(|k| k.time_created)
                .unwrap_or(END_OF_TIME);

            // Ownership changes inside this state's lifetime. A transfer
            // at the creation step collapses the creator's interval to
            // zero width; one at the first child's step is already the
            // child's history. Self-transfers carry no information.
            let events: Vec<transactions::OwnerChange> =
                transactions::owner_changes(conn, self.sim, node.resource)?
                    .into_iter()
                    .filter(|ev| ev.time >= node.start_time && ev.time < tentative_end)
                    .filter(|ev| ev.receiver != node.owner)
                    .collect();

            let mut end_time = tentative_end;
            let mut child_owner = node.owner;
            if let (Some(first), Some(last)) = (events.first(), events.last()) {
                end_time = first.time;
                child_owner = last.receiver;
            }

            state.push(InventoryRow {
                resource: node.resource,
                agent: node.owner,
                start_time: node.start_time,
                end_time,
                qual: node.qual,
                quantity: node.quantity,
            });

            for (i, ev) in events.iter().enumerate() {
                let span_end = events
                    .get(i + 1)
                    .map(|next| next.time)
                    .unwrap_or(tentative_end);
                state.push(InventoryRow {
                    resource: node.resource,
                    agent: ev.receiver,
                    start_time: ev.time,
                    end_time: span_end,
                    qual: node.qual,
                    quantity: node.quantity,
                });
            }

            for kid in kids.into_iter().rev() {
                stack.push(WalkNode {
                    resource: kid.resource,
                    owner: child_owner,
                    start_time: kid.time_created,
                    qual: kid.qual,
                    quantity: kid.quantity,
                });
            }
        }

        Ok(())
    }

    fn flush(&self, conn: &Connection, state: &mut WalkState) -> Result<(), InventoryError> {
        if state.buffer.is_empty() {
            return Ok(());
        }
        let written = inventories::insert_batch(conn, self.sim, &state.buffer)?;
        state.rows_written += written;
        debug!(
            resources = state.res_count,
            rows = state.rows_written,
            "flushed inventory batch"
        );
        state.buffer.clear();
        Ok(())
    }
}
