//! Integer ID newtypes for simulation entities.
//!
//! Each ID type wraps the database's native `i64` to prevent cross-type
//! confusion. A `QualId` cannot be accidentally used where an `AgentId` is
//! expected. All types bind directly in SQL statements via `ToSql`/`FromSql`.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl $name {
            /// Create an ID from its raw database value.
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw database value.
            pub fn raw(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

define_id!(
    /// Resource object identifier, unique within a simulation.
    ResourceId
);

define_id!(
    /// Simulated actor identifier.
    AgentId
);

define_id!(
    /// Composition (quality) identifier.
    QualId
);

define_id!(
    /// Nuclide identifier.
    NucId
);

define_id!(
    /// Inter-agent transfer identifier.
    TransactionId
);

impl AgentId {
    /// Sentinel for nodes whose owning agent is not recorded in the
    /// inventory table (intra-step, intra-agent transformations).
    pub const UNKNOWN: AgentId = AgentId(-1);

    /// Whether this is the unknown-agent sentinel.
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}
