//! The provenance tree: an arena of resource-state nodes linked through
//! parent and child slots.
//!
//! Nodes live in a contiguous vector; every cross-reference is an index
//! into it. Rows are sorted by effective time before nodes are created,
//! so ascending index order is a topological order: a node's parents
//! always precede it. "Tree" is a historical name: two-parent combines
//! make the structure a DAG with diamonds, so every walk is guarded by a
//! visited set.

use std::collections::VecDeque;

use lode_core::errors::TaintError;
use lode_core::types::collections::{FxHashMap, FxHashSet};
use lode_core::types::ids::{AgentId, QualId, ResourceId};
use lode_storage::queries::inventories::ProvenanceRow;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One resource state at one location in time.
#[derive(Debug, Clone)]
pub struct ProvNode {
    pub resource: ResourceId,
    pub agent: AgentId,
    pub time: i64,
    pub qual: QualId,
    pub quantity: f64,
    pub parent1: Option<NodeId>,
    pub parent2: Option<NodeId>,
    pub child1: Option<NodeId>,
    pub child2: Option<NodeId>,
}

impl ProvNode {
    /// A node with neither parent link populated is a root.
    pub fn is_root(&self) -> bool {
        self.parent1.is_none() && self.parent2.is_none()
    }

    /// A node with no children is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.child1.is_none() && self.child2.is_none()
    }
}

/// Arena-backed provenance DAG for one simulation.
#[derive(Debug)]
pub struct ProvTree {
    nodes: Vec<ProvNode>,
    roots: Vec<NodeId>,
}

/// A resource not only inherits a new owner at a transfer; its node is
/// dated to the transfer, so downstream aggregation places mass in the
/// right time slot.
fn effective_time(row: &ProvenanceRow) -> i64 {
    match row.interval_start {
        Some(start) if start > row.time_created => start,
        _ => row.time_created,
    }
}

impl ProvTree {
    /// Build the tree from provenance rows (resources joined with their
    /// inventory intervals).
    pub fn from_rows(mut rows: Vec<ProvenanceRow>) -> Result<Self, TaintError> {
        rows.sort_by_key(|r| {
            (
                effective_time(r),
                r.resource,
                r.agent.unwrap_or(AgentId::UNKNOWN),
            )
        });

        let mut nodes: Vec<ProvNode> = Vec::with_capacity(rows.len());
        let mut roots = Vec::new();
        // Latest node created for each resource id: the chronologically
        // immediate predecessor of any new node with the same id.
        let mut latest: FxHashMap<ResourceId, NodeId> = FxHashMap::default();

        for row in rows {
            let id = NodeId(nodes.len() as u32);
            let mut node = ProvNode {
                resource: row.resource,
                agent: row.agent.unwrap_or(AgentId::UNKNOWN),
                time: effective_time(&row),
                qual: row.qual,
                quantity: row.quantity,
                parent1: None,
                parent2: None,
                child1: None,
                child2: None,
            };

            if let Some(&prev) = latest.get(&row.resource) {
                // Same resource moving between agents (or a later state
                // of it): chain onto its previous node.
                node.parent1 = Some(prev);
                nodes[prev.index()].child1 = Some(id);
            } else {
                // First appearance: link through the raw parent columns.
                if let Some(p1) = row.parent1 {
                    let parent = Self::link_parent(&mut nodes, &latest, row.resource, p1, id)?;
                    node.parent1 = Some(parent);
                }
                if let Some(p2) = row.parent2 {
                    let parent = Self::link_parent(&mut nodes, &latest, row.resource, p2, id)?;
                    node.parent2 = Some(parent);
                }
            }

            if node.is_root() {
                roots.push(id);
            }
            latest.insert(row.resource, id);
            nodes.push(node);
        }

        let mut tree = Self { nodes, roots };
        tree.fix_agents();
        Ok(tree)
    }

    /// Attach `child` under the latest node of `parent_res`, filling
    /// `child1` first, then `child2`.
    fn link_parent(
        nodes: &mut [ProvNode],
        latest: &FxHashMap<ResourceId, NodeId>,
        resource: ResourceId,
        parent_res: ResourceId,
        child: NodeId,
    ) -> Result<NodeId, TaintError> {
        let &parent = latest
            .get(&parent_res)
            .ok_or(TaintError::MissingParent {
                resource,
                parent: parent_res,
            })?;
        let slot = &mut nodes[parent.index()];
        if slot.child1.is_none() {
            slot.child1 = Some(child);
        } else {
            slot.child2 = Some(child);
        }
        Ok(parent)
    }

    /// Fill in unknown agent ids. Intra-step, intra-agent transformations
    /// are omitted from the inventory table and carry no agent; they
    /// inherit from `parent1`. Ascending order guarantees the parent is
    /// already resolved.
    fn fix_agents(&mut self) {
        for i in 0..self.nodes.len() {
            if self.nodes[i].agent.is_unknown() {
                if let Some(p1) = self.nodes[i].parent1 {
                    self.nodes[i].agent = self.nodes[p1.index()].agent;
                }
            }
        }
    }

    /// Breadth-first search from the roots for the shallowest node with
    /// the given resource id.
    pub fn locate(&self, resource: ResourceId) -> Option<NodeId> {
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut queue: VecDeque<NodeId> = self.roots.iter().copied().collect();
        visited.extend(self.roots.iter().copied());

        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            if node.resource == resource {
                return Some(id);
            }
            for child in [node.child1, node.child2].into_iter().flatten() {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        None
    }

    pub fn node(&self, id: NodeId) -> &ProvNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }
}
