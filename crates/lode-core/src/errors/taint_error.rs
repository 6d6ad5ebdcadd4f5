//! Taint-analysis errors.

use super::StorageError;
use crate::types::ids::ResourceId;

/// Errors that can occur while building the provenance tree or
/// computing taint series.
#[derive(Debug, thiserror::Error)]
pub enum TaintError {
    #[error("resource {resource} not found in provenance tree")]
    ResourceNotFound { resource: ResourceId },

    #[error("resource {resource} references parent {parent} with no prior node")]
    MissingParent {
        resource: ResourceId,
        parent: ResourceId,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
