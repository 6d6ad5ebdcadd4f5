//! Post-processing configuration.

use serde::{Deserialize, Serialize};

/// Tunables for one post-processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Number of buffered inventory intervals between flushes to the store.
    /// Flushes happen inside the simulation's single write transaction.
    pub dump_freq: usize,

    /// Tolerance for composition mass-fraction sums and combine-node
    /// quantity conservation.
    pub mass_tolerance: f64,

    /// Keep processing remaining simulations after a fatal error.
    pub continue_on_error: bool,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            dump_freq: 100_000,
            mass_tolerance: 1e-6,
            continue_on_error: false,
        }
    }
}
