//! # lode-core
//!
//! Foundation crate for the lode post-processor.
//! Defines identifier types, error enums, configuration, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::PostConfig;
pub use errors::{InventoryError, ProcessError, StorageError, TaintError};
pub use types::sim::{SimId, END_OF_TIME};
pub use types::{AgentId, NucId, QualId, ResourceId, TransactionId};
