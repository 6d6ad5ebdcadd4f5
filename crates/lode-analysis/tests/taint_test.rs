//! Taint-analyzer tests: tree shapes, fraction propagation through
//! transmutes/splits/combines, aggregation, and the full pipeline from
//! raw rows through the inventory walk.

mod common;

use common::*;
use lode_analysis::inventory::walker::InventoryWalker;
use lode_analysis::taint::analyzer::{taint_from, TaintVal};
use lode_analysis::taint::tree::ProvTree;
use lode_analysis::taint::taint_series;
use lode_core::config::PostConfig;
use lode_core::types::ids::{AgentId, QualId, ResourceId};
use lode_storage::queries::inventories::ProvenanceRow;

const A1: AgentId = AgentId(1);
const A2: AgentId = AgentId(2);

fn res(n: i64) -> ResourceId {
    ResourceId(n)
}

fn prov(
    resource: i64,
    agent: i64,
    time: i64,
    quantity: f64,
    parent1: Option<i64>,
    parent2: Option<i64>,
) -> ProvenanceRow {
    ProvenanceRow {
        resource: ResourceId(resource),
        time_created: time,
        interval_start: None,
        quantity,
        qual: QualId(1),
        parent1: parent1.map(ResourceId),
        parent2: parent2.map(ResourceId),
        agent: Some(AgentId(agent)),
    }
}

fn start_of(tree: &ProvTree, resource: ResourceId) -> lode_analysis::taint::tree::NodeId {
    tree.locate(resource).expect("start resource present")
}

#[test]
fn split_then_move_time_series() {
    // r1 splits into r2 and r3 at t=2; r2 moves to agent 2 in the same
    // step.
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 1, 3.0, None, None),
        prov(2, 1, 2, 1.0, Some(1), None),
        prov(3, 1, 2, 2.0, Some(1), None),
        prov(2, 2, 2, 1.0, Some(1), None),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(1)), 3);

    assert_eq!(
        all[&A1],
        vec![
            TaintVal { taint: 0.0, quantity: 0.0 },
            TaintVal { taint: 1.0, quantity: 3.0 },
            TaintVal { taint: 1.0, quantity: 2.0 },
        ]
    );
    assert_eq!(
        all[&A2],
        vec![
            TaintVal { taint: 0.0, quantity: 0.0 },
            TaintVal { taint: 0.0, quantity: 0.0 },
            TaintVal { taint: 1.0, quantity: 1.0 },
        ]
    );
}

#[test]
fn transmute_preserves_full_taint() {
    // Same lineage, new composition, different quantity: no combine, so
    // the fraction passes through unchanged.
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 0, 2.0, None, None),
        prov(2, 1, 1, 5.0, Some(1), None),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(1)), 2);
    assert_eq!(all[&A1][1], TaintVal { taint: 1.0, quantity: 5.0 });
}

#[test]
fn combine_mass_weights_mixed_provenance() {
    // r3 = r1 (tainted, 1 kg) + r2 (clean, 3 kg).
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 0, 1.0, None, None),
        prov(2, 1, 0, 3.0, None, None),
        prov(3, 1, 2, 4.0, Some(1), Some(2)),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(1)), 3);
    assert_eq!(all[&A1][2], TaintVal { taint: 0.25, quantity: 4.0 });
}

#[test]
fn equal_combine_of_tainted_and_clean_halves_the_fraction() {
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 0, 2.0, None, None),
        prov(2, 1, 0, 2.0, None, None),
        prov(3, 1, 1, 4.0, Some(1), Some(2)),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(1)), 2);
    assert_eq!(all[&A1][1], TaintVal { taint: 0.5, quantity: 4.0 });
}

#[test]
fn taint_fraction_stays_in_unit_range() {
    // A diamond: r1 splits into r2/r3, which recombine into r4.
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 0, 2.0, None, None),
        prov(2, 1, 1, 1.0, Some(1), None),
        prov(3, 1, 1, 1.0, Some(1), None),
        prov(4, 1, 2, 2.0, Some(2), Some(3)),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(1)), 3);
    for series in all.values() {
        for val in series {
            assert!((0.0..=1.0).contains(&val.taint), "taint {} out of range", val.taint);
        }
    }
}

#[test]
fn diamond_aggregates_each_node_once() {
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 0, 2.0, None, None),
        prov(2, 1, 1, 1.0, Some(1), None),
        prov(3, 1, 1, 1.0, Some(1), None),
        prov(4, 1, 2, 2.0, Some(2), Some(3)),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(1)), 3);
    // r4 is reachable via both parents but must contribute its 2 kg once.
    assert_eq!(all[&A1][2], TaintVal { taint: 1.0, quantity: 2.0 });
}

#[test]
fn leaf_taint_forward_fills_to_tmax() {
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 0, 2.0, None, None),
        prov(2, 1, 1, 2.0, Some(1), None),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(1)), 5);
    for t in 1..5 {
        assert_eq!(all[&A1][t], TaintVal { taint: 1.0, quantity: 2.0 });
    }
}

#[test]
fn untainted_sibling_contributes_zero() {
    // Taint starts at r2: its sibling r3 and the root stay clean.
    let tree = ProvTree::from_rows(vec![
        prov(1, 1, 0, 3.0, None, None),
        prov(2, 1, 1, 1.0, Some(1), None),
        prov(3, 1, 1, 2.0, Some(1), None),
    ])
    .unwrap();

    let all = taint_from(&tree, start_of(&tree, res(2)), 2);
    let at_1 = all[&A1][1];
    assert_eq!(at_1.quantity, 1.0, "only the start node's own mass is aggregated");
    assert_eq!(at_1.taint, 1.0);
}

#[test]
fn taint_series_end_to_end() {
    let db = fresh_db();
    let conn = db.conn();
    let sim = sim_id(20);

    insert_info(conn, sim, 4);
    insert_agent(conn, sim, A1, "Source", 0);
    insert_agent(conn, sim, A2, "Sink", 0);
    insert_resource(conn, sim, res(1), 1, QualId(1), 3.0, None, None);
    insert_creator(conn, sim, res(1), A1);
    insert_resource(conn, sim, res(2), 2, QualId(1), 1.0, Some(res(1)), None);
    insert_resource(conn, sim, res(3), 2, QualId(1), 2.0, Some(res(1)), None);
    insert_transaction(conn, sim, 1.into(), A1, A2, res(2), 3);

    InventoryWalker::new(&db, sim, &PostConfig::default())
        .run()
        .unwrap();

    // tmax = -1 resolves to the simulation duration.
    let all = taint_series(conn, sim, res(1), -1).unwrap();

    assert_eq!(
        all[&A1],
        vec![
            TaintVal { taint: 0.0, quantity: 0.0 },
            TaintVal { taint: 1.0, quantity: 3.0 },
            TaintVal { taint: 1.0, quantity: 3.0 },
            TaintVal { taint: 1.0, quantity: 2.0 },
        ]
    );
    assert_eq!(
        all[&A2],
        vec![
            TaintVal { taint: 0.0, quantity: 0.0 },
            TaintVal { taint: 0.0, quantity: 0.0 },
            TaintVal { taint: 0.0, quantity: 0.0 },
            TaintVal { taint: 1.0, quantity: 1.0 },
        ]
    );
}
