use serde::Serialize;
use tracing::info;

use crate::config::StoreConfig;
use crate::persistence::{CaregiverRecord, JsonRecordStore, RecordStore, StoreResult};
use crate::shift_types::CAREGIVER_SEED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "count", rename_all = "snake_case")]
pub enum SeedOutcome {
    /// The collection was empty and now holds the seed list.
    Seeded(usize),
    /// Caregivers were already present; nothing was written.
    AlreadyPresent(usize),
}

/// Writes the seed caregivers (ids `1..=N` in seed order) when the collection is
/// empty. Existing caregivers are left alone whatever they contain.
pub fn init_data<S: RecordStore + ?Sized>(store: &S) -> StoreResult<SeedOutcome> {
    let existing = store.get_caregivers()?;
    if !existing.is_empty() {
        info!(count = existing.len(), "found existing caregivers");
        return Ok(SeedOutcome::AlreadyPresent(existing.len()));
    }

    info!("no caregivers found, initializing caregivers");
    let caregivers: Vec<CaregiverRecord> = CAREGIVER_SEED
        .iter()
        .zip(1..)
        .map(|(name, id)| CaregiverRecord::new(id, *name))
        .collect();
    store.save_caregivers(&caregivers)?;
    info!(count = caregivers.len(), "initialized caregivers");
    Ok(SeedOutcome::Seeded(caregivers.len()))
}

/// Startup hook: opens the configured store, creates missing files and seeds
/// caregivers.
pub fn bootstrap(config: &StoreConfig) -> StoreResult<JsonRecordStore> {
    info!(data_dir = %config.data_dir.display(), read_failure = ?config.read_failure, "initializing data storage");
    let store = JsonRecordStore::from_config(config);
    store.ensure_storage()?;
    init_data(&store)?;
    Ok(store)
}
