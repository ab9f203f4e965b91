//! per-calculator snapshots of form state, kept behind an injected store

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::errors::{CalcError, Result};

pub const TIME_DURATION_KEY: &str = "timeDurationCalcState";
pub const PERCENTAGE_KEY: &str = "percentageCalcState";
pub const GST_KEY: &str = "gstCalcState";
pub const LOAN_EMI_KEY: &str = "loanEmiCalcState";
pub const AGE_ELIGIBILITY_KEY: &str = "ageEligibilityCalcState";
pub const MERIT_KEY: &str = "meritCalcState";

/// key-value storage for snapshots
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// store that lives for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// serialize `state` as JSON under `key`
pub fn save_snapshot<T: Serialize>(store: &mut dyn SessionStore, key: &str, state: &T) -> Result<()> {
    let json = serde_json::to_string(state).map_err(|e| CalcError::Snapshot {
        message: e.to_string(),
    })?;
    debug!(key, bytes = json.len(), "saving session snapshot");
    store.set(key, json);
    Ok(())
}

/// read the snapshot under `key`; a corrupt snapshot is treated as absent
pub fn load_snapshot<T: DeserializeOwned>(store: &dyn SessionStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!(key, error = %e, "error loading saved state, using defaults");
            None
        }
    }
}

/// forget the snapshot under `key` (calculator reset)
pub fn clear_snapshot(store: &mut dyn SessionStore, key: &str) {
    store.remove(key);
}
