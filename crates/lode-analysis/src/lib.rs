//! # lode-analysis
//!
//! The two core subsystems of the post-processor:
//!
//! - [`inventory`] walks the resource-provenance DAG from creator roots
//!   and synthesizes the dense `Inventories` interval table, along with
//!   the `Agents` and `TimeList` materializations.
//! - [`taint`] builds a time-sorted provenance tree over resources and
//!   their inventory intervals, and computes per-agent time series of
//!   mass and taint fraction descending from a distinguished resource.

pub mod inventory;
pub mod taint;

pub use inventory::processor::{process_all, process_sim};
pub use inventory::walker::InventoryWalker;
pub use taint::analyzer::TaintVal;
pub use taint::taint_series;
pub use taint::tree::ProvTree;
