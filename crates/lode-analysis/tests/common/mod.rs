//! Shared fixtures: an in-memory database seeded with the raw simulator
//! tables, plus row-insert helpers.

#![allow(dead_code)]

use lode_core::types::ids::{AgentId, NucId, QualId, ResourceId, TransactionId};
use lode_core::types::sim::SimId;
use lode_storage::{schema, Database};
use rusqlite::{params, Connection};

/// A deterministic tag for test simulations.
pub fn sim_id(n: u8) -> SimId {
    SimId::new([n; 16])
}

/// Open an in-memory database with the full raw schema in place.
pub fn fresh_db() -> Database {
    lode_core::tracing::init_tracing();
    let db = Database::open_in_memory().expect("open in-memory db");
    db.conn()
        .execute_batch(
            "CREATE TABLE Info (SimId BLOB, Duration INTEGER, DecayInterval INTEGER);
             CREATE TABLE AgentEntry (SimId BLOB, AgentId INTEGER, Kind TEXT, Spec TEXT,
                 Prototype TEXT, ParentId INTEGER, Lifetime INTEGER, EnterTime INTEGER);",
        )
        .expect("create raw tables");
    schema::prepare(db.conn()).expect("prepare schema");
    db
}

pub fn insert_info(conn: &Connection, sim: SimId, duration: i64) {
    conn.execute(
        "INSERT INTO Info VALUES (?1, ?2, ?3)",
        params![sim, duration, 2],
    )
    .expect("insert info");
}

pub fn insert_agent(conn: &Connection, sim: SimId, agent: AgentId, proto: &str, enter: i64) {
    conn.execute(
        "INSERT INTO AgentEntry VALUES (?1, ?2, 'Facility', ':agents:Source', ?3, 0, -1, ?4)",
        params![sim, agent, proto, enter],
    )
    .expect("insert agent entry");
}

pub fn insert_agent_exit(conn: &Connection, sim: SimId, agent: AgentId, exit: i64) {
    conn.execute(
        "INSERT INTO AgentExit VALUES (?1, ?2, ?3)",
        params![sim, agent, exit],
    )
    .expect("insert agent exit");
}

#[allow(clippy::too_many_arguments)]
pub fn insert_resource(
    conn: &Connection,
    sim: SimId,
    res: ResourceId,
    time: i64,
    qual: QualId,
    quantity: f64,
    parent1: Option<ResourceId>,
    parent2: Option<ResourceId>,
) {
    conn.execute(
        "INSERT INTO Resources VALUES (?1, ?2, ?2, 'Material', ?3, ?4, 'kg', ?5, ?6, ?7)",
        params![
            sim,
            res,
            time,
            quantity,
            qual,
            parent1.map(|p| p.raw()).unwrap_or(0),
            parent2.map(|p| p.raw()).unwrap_or(0),
        ],
    )
    .expect("insert resource");
}

pub fn insert_creator(conn: &Connection, sim: SimId, res: ResourceId, agent: AgentId) {
    conn.execute(
        "INSERT INTO ResCreators VALUES (?1, ?2, ?3)",
        params![sim, res, agent],
    )
    .expect("insert creator");
}

pub fn insert_transaction(
    conn: &Connection,
    sim: SimId,
    tx: TransactionId,
    sender: AgentId,
    receiver: AgentId,
    res: ResourceId,
    time: i64,
) {
    conn.execute(
        "INSERT INTO Transactions VALUES (?1, ?2, ?3, ?4, ?5, 'fuel', ?6)",
        params![sim, tx, sender, receiver, res, time],
    )
    .expect("insert transaction");
}

pub fn insert_composition(conn: &Connection, sim: SimId, qual: QualId, nuc: NucId, frac: f64) {
    conn.execute(
        "INSERT INTO Compositions VALUES (?1, ?2, ?3, ?4)",
        params![sim, qual, nuc, frac],
    )
    .expect("insert composition");
}

/// Count rows for one simulation in a derived table.
pub fn count_rows(conn: &Connection, table: &str, sim: SimId) -> i64 {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE SimId = ?1"),
        params![sim],
        |row| row.get(0),
    )
    .expect("count rows")
}
