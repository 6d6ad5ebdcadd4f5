//! Derived-table DDL and index management.
//!
//! `prepare` runs once per database before any walking; `finish` runs once
//! after the last simulation has been walked. Input tables are created
//! IF NOT EXISTS so partially populated databases still process.

use lode_core::errors::StorageError;
use rusqlite::Connection;

/// Build a `CREATE INDEX IF NOT EXISTS` statement for the given columns.
pub fn index_sql(table: &str, cols: &[&str]) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {} ({});",
        table.to_lowercase(),
        cols.join("_").to_lowercase(),
        table,
        cols.join(",")
    )
}

/// Tables and indexes required before walking begins.
fn pre_statements() -> Vec<String> {
    let mut stmts: Vec<String> = [
        "CREATE TABLE IF NOT EXISTS AgentExit (SimId BLOB,AgentId INTEGER,ExitTime INTEGER);",
        "CREATE TABLE IF NOT EXISTS Compositions (SimId BLOB,QualId INTEGER,NucId INTEGER,MassFrac REAL);",
        "CREATE TABLE IF NOT EXISTS Resources (SimId BLOB,ResourceId INTEGER,ObjId INTEGER,Type TEXT,TimeCreated INTEGER,Quantity REAL,Units TEXT,QualId INTEGER,Parent1 INTEGER,Parent2 INTEGER);",
        "CREATE TABLE IF NOT EXISTS ResCreators (SimId BLOB,ResourceId INTEGER,AgentId INTEGER);",
        "CREATE TABLE IF NOT EXISTS Transactions (SimId BLOB,TransactionId INTEGER,SenderId INTEGER,ReceiverId INTEGER,ResourceId INTEGER,Commodity TEXT,Time INTEGER);",
        "CREATE TABLE IF NOT EXISTS Agents (SimId BLOB,AgentId INTEGER,Kind TEXT,Spec TEXT,Prototype TEXT,ParentId INTEGER,Lifetime INTEGER,EnterTime INTEGER,ExitTime INTEGER);",
        "CREATE TABLE IF NOT EXISTS TimeList (SimId BLOB,Time INTEGER);",
        "CREATE TABLE IF NOT EXISTS Inventories (SimId BLOB,ResourceId INTEGER,AgentId INTEGER,StartTime INTEGER,EndTime INTEGER,QualId INTEGER,Quantity REAL);",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    stmts.push(index_sql("TimeList", &["Time"]));
    stmts.push(index_sql("TimeList", &["SimId", "Time"]));
    stmts.push(index_sql("Resources", &["SimId", "ResourceId", "QualId"]));
    stmts.push(index_sql("Compositions", &["SimId", "QualId", "NucId"]));
    stmts.push(index_sql("Transactions", &["SimId", "ResourceId"]));
    stmts.push(index_sql("Transactions", &["TransactionId"]));
    stmts.push(index_sql("ResCreators", &["SimId", "ResourceId"]));
    stmts
}

/// Indexes deferred until all inventory rows are in place.
fn post_statements() -> Vec<String> {
    vec![
        index_sql("Agents", &["SimId", "Prototype"]),
        index_sql("Agents", &["SimId", "AgentId", "Prototype"]),
        index_sql(
            "Inventories",
            &["SimId", "AgentId", "StartTime", "EndTime", "Quantity"],
        ),
        index_sql("Inventories", &["SimId", "ResourceId", "StartTime"]),
        index_sql(
            "Inventories",
            &["SimId", "StartTime", "EndTime", "ResourceId", "Quantity"],
        ),
        "ANALYZE;".to_string(),
    ]
}

/// Create the tables and indexes required for efficient inventory
/// calculation. Call once per database before walking begins.
pub fn prepare(conn: &Connection) -> Result<(), StorageError> {
    for stmt in pre_statements() {
        conn.execute_batch(&stmt)
            .map_err(|e| StorageError::SqliteError {
                message: format!("prepare failed on `{stmt}`: {e}"),
            })?;
    }
    tracing::debug!("prepared derived tables and pre-walk indexes");
    Ok(())
}

/// Create final indexes and run ANALYZE. Call once after all simulations
/// have been walked.
pub fn finish(conn: &Connection) -> Result<(), StorageError> {
    for stmt in post_statements() {
        conn.execute_batch(&stmt)
            .map_err(|e| StorageError::SqliteError {
                message: format!("finish failed on `{stmt}`: {e}"),
            })?;
    }
    tracing::debug!("built final inventory indexes");
    Ok(())
}
