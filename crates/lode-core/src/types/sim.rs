//! Simulation tags and time conventions.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// Stored stand-in for "+infinity" on open-ended inventory intervals.
/// The value is `i32::MAX` so rows written by earlier revisions of the
/// post-processor compare equal.
pub const END_OF_TIME: i64 = i32::MAX as i64;

/// Opaque 16-byte simulation tag.
///
/// Stored as a BLOB; rendered as lowercase hex wherever a simulation must
/// be named (temporary table names, failure messages, logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimId(pub [u8; 16]);

impl SimId {
    /// Wrap raw tag bytes.
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// The raw tag bytes, as bound into SQL statements.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parse the canonical 32-character hex form.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for SimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl ToSql for SimId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(&self.0[..]))
    }
}

impl FromSql for SimId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let blob = value.as_blob()?;
        let bytes: [u8; 16] =
            blob.try_into()
                .map_err(|_| FromSqlError::InvalidBlobSize {
                    expected_size: 16,
                    blob_size: blob.len(),
                })?;
        Ok(Self(bytes))
    }
}
