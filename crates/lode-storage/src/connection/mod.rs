//! Connection management: one write connection per database handle.

pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};

use lode_core::errors::StorageError;
use rusqlite::Connection;

use self::pragmas::apply_pragmas;

/// Owns the connection to one simulator output database.
///
/// Processing is single-threaded per simulation, so there is no reader
/// pool; simulations processed in parallel each open their own `Database`.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open a database at the given path and apply pragmas.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        apply_pragmas(&conn)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        apply_pragmas(&conn)?;

        Ok(Self { conn, path: None })
    }

    /// The underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Get the database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
