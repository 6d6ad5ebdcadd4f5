//! Batch processing of every simulation in a database.

use lode_core::config::PostConfig;
use lode_core::errors::ProcessError;
use lode_core::types::sim::SimId;
use lode_storage::queries::info;
use lode_storage::{schema, Database};
use tracing::{error, info};

use super::walker::InventoryWalker;

/// Post-process one simulation. Schema preparation and final indexing
/// remain the caller's responsibility; see [`process_all`].
pub fn process_sim(db: &Database, sim: SimId, config: &PostConfig) -> Result<(), ProcessError> {
    InventoryWalker::new(db, sim, config).run()?;
    Ok(())
}

/// Post-process every simulation in the database in sequence.
///
/// Already-processed simulations are skipped. A fatal error halts the
/// batch unless `config.continue_on_error` is set. Final indexes are
/// built only if at least one simulation was newly processed. Returns
/// the tags found in the database.
pub fn process_all(db: &Database, config: &PostConfig) -> Result<Vec<SimId>, ProcessError> {
    schema::prepare(db.conn())?;

    let sims = info::sim_ids(db.conn())?;
    let mut newly_processed = 0;

    for &sim in &sims {
        match InventoryWalker::new(db, sim, config).run() {
            Ok(()) => newly_processed += 1,
            Err(e) if e.is_already_processed() => {
                info!(sim = %sim, "already post-processed, skipping");
            }
            Err(e) => {
                if config.continue_on_error {
                    error!(sim = %sim, error = %e, "processing failed, continuing");
                } else {
                    return Err(e.into());
                }
            }
        }
    }

    if newly_processed > 0 {
        schema::finish(db.conn())?;
    }

    Ok(sims)
}
