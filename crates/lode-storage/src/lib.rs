//! # lode-storage
//!
//! Read/write access to the simulator output database: connection
//! management, derived-table schema, and one query module per table
//! family. The analysis crates borrow a [`Database`] for the duration of
//! one simulation's processing; transaction lifetime stays with the
//! caller.

pub mod connection;
pub mod queries;
pub mod schema;

pub use connection::writer::with_immediate_transaction;
pub use connection::Database;
