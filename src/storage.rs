use gloo_storage::{LocalStorage, Storage};
use log::warn;
use serde::{Deserialize, Serialize};

const STORAGE_KEY: &str = "tier_guide_state";

/// Only the selected guide survives a reload. Modified rankings are
/// deliberately ephemeral; reloading restores the published ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredAppState {
    pub selected_guide: Option<String>,
}

pub fn load_state() -> StoredAppState {
    match LocalStorage::get::<StoredAppState>(STORAGE_KEY) {
        Ok(state) => state,
        Err(err) => {
            warn!("Falling back to default app state: {}", err);
            StoredAppState::default()
        }
    }
}

pub fn save_state(state: &StoredAppState) {
    if let Err(err) = LocalStorage::set(STORAGE_KEY, state) {
        warn!("Failed to persist state: {}", err);
    }
}
