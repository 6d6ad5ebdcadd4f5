//! Taint propagation and per-agent aggregation.
//!
//! Given a start node, three passes over the arena:
//! mark the subgraph reachable from it, propagate mass-weighted taint
//! fractions through it, then aggregate (taint, quantity) pairs per agent
//! and time step. The first two passes are single ascending sweeps:
//! arena order is topological, so every parent is resolved before its
//! children are visited.

use lode_core::types::collections::{FxHashMap, FxHashSet};
use lode_core::types::ids::AgentId;

use super::tree::{NodeId, ProvTree};

/// Aggregate holdings at one (agent, time) slot: total quantity and the
/// fraction of it descending from the start node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaintVal {
    pub taint: f64,
    pub quantity: f64,
}

/// Transient per-node analysis state. Allocated fresh per call, which
/// also serves as the reset of any prior run's values.
struct Marks {
    via_parent1: Vec<bool>,
    via_parent2: Vec<bool>,
    frac: Vec<f64>,
}

impl Marks {
    fn marked(&self, id: NodeId) -> bool {
        self.via_parent1[id.index()] || self.via_parent2[id.index()]
    }
}

/// Compute the per-agent taint time series over `[0, tmax)` for the
/// subgraph descending from `start`.
pub fn taint_from(
    tree: &ProvTree,
    start: NodeId,
    tmax: i64,
) -> FxHashMap<AgentId, Vec<TaintVal>> {
    let marks = mark(tree, start);
    let marks = propagate(tree, start, marks);
    aggregate(tree, start, &marks, tmax.max(0) as usize)
}

/// A node is marked via parent k when that parent is the start node or is
/// itself marked. Nodes preceding the start in arena order cannot descend
/// from it and are skipped.
fn mark(tree: &ProvTree, start: NodeId) -> Marks {
    let n = tree.len();
    let mut marks = Marks {
        via_parent1: vec![false; n],
        via_parent2: vec![false; n],
        frac: vec![-1.0; n],
    };

    for i in (start.index() + 1)..n {
        let id = NodeId(i as u32);
        let node = tree.node(id);
        if let Some(p1) = node.parent1 {
            if p1 == start || marks.marked(p1) {
                marks.via_parent1[i] = true;
            }
        }
        if let Some(p2) = node.parent2 {
            if p2 == start || marks.marked(p2) {
                marks.via_parent2[i] = true;
            }
        }
    }

    marks
}

/// Assign taint fractions over the marked subgraph. A single parent
/// passes its fraction through unchanged (transmute, move, split); two
/// parents mass-weight their contributions, with unmarked parents
/// contributing zero.
fn propagate(tree: &ProvTree, start: NodeId, mut marks: Marks) -> Marks {
    marks.frac[start.index()] = 1.0;

    for i in (start.index() + 1)..tree.len() {
        if !marks.via_parent1[i] && !marks.via_parent2[i] {
            continue;
        }
        let node = tree.node(NodeId(i as u32));

        marks.frac[i] = match (node.parent1, node.parent2) {
            (Some(p1), None) => marks.frac[p1.index()],
            (None, Some(p2)) => marks.frac[p2.index()],
            (Some(p1), Some(p2)) => {
                let f1 = if marks.via_parent1[i] {
                    marks.frac[p1.index()]
                } else {
                    0.0
                };
                let f2 = if marks.via_parent2[i] {
                    marks.frac[p2.index()]
                } else {
                    0.0
                };
                let q1 = tree.node(p1).quantity;
                let q2 = tree.node(p2).quantity;
                (f1 * q1 + f2 * q2) / node.quantity
            }
            (None, None) => unreachable!("marked node has no parents"),
        };
    }

    marks
}

/// Fold one contribution into a slot by mass-weighted combination.
fn accumulate(slot: &mut TaintVal, frac: f64, quantity: f64) {
    let total = slot.quantity + quantity;
    let tainted = slot.taint * slot.quantity + frac * quantity;
    *slot = TaintVal {
        taint: tainted / total,
        quantity: total,
    };
}

/// Pre-order walk of the subgraph, emitting at boundary nodes only:
/// leaves, and nodes whose first child sits at a later time step.
/// Intra-step transformations within one agent collapse into the last
/// node. Diamonds make the visited guard load-bearing; without it a
/// two-parent node would contribute its mass twice.
fn aggregate(
    tree: &ProvTree,
    start: NodeId,
    marks: &Marks,
    tmax: usize,
) -> FxHashMap<AgentId, Vec<TaintVal>> {
    let mut all: FxHashMap<AgentId, Vec<TaintVal>> = FxHashMap::default();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let node = tree.node(id);
        let series = all
            .entry(node.agent)
            .or_insert_with(|| vec![TaintVal::default(); tmax]);

        let first_child = node.child1.map(|c| tree.node(c));
        let boundary =
            node.is_leaf() || first_child.is_some_and(|c| c.time != node.time);

        if boundary && (node.time as usize) < tmax {
            let t = node.time as usize;
            let frac = marks.frac[id.index()];
            accumulate(&mut series[t], frac, node.quantity);

            // Forward-fill the contribution through blank steps: up to
            // the first child's time, or for leaves through all
            // remaining steps.
            let fill_end = match first_child {
                Some(c) => (c.time as usize).min(tmax),
                None => tmax,
            };
            for slot in &mut series[(t + 1)..fill_end] {
                accumulate(slot, frac, node.quantity);
            }
        }

        if let Some(c2) = node.child2 {
            stack.push(c2);
        }
        if let Some(c1) = node.child1 {
            stack.push(c1);
        }
    }

    all
}
