//! Error handling for lode.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod inventory_error;
pub mod process_error;
pub mod storage_error;
pub mod taint_error;

pub use inventory_error::InventoryError;
pub use process_error::ProcessError;
pub use storage_error::StorageError;
pub use taint_error::TaintError;
