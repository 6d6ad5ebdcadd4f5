//! Table queries, one module per table family.

pub mod agents;
pub mod compositions;
pub mod info;
pub mod inventories;
pub mod resources;
pub mod timelist;
pub mod transactions;
