//! Inventory building: validation, the DAG walk, and the batch processor.

pub mod processor;
pub mod validate;
pub mod walker;
