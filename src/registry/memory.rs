//! In-memory name registry
//!
//! Counts recorded names in a map. Used when no ledger file is configured.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::RegistryError;
use crate::registry::NameRegistry;

/// Registry held in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    counts: Mutex<HashMap<String, u64>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with one record per name.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = HashMap::new();
        for name in names {
            *counts.entry(name.into()).or_insert(0) += 1;
        }
        Self {
            counts: Mutex::new(counts),
        }
    }

    fn counts(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.counts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NameRegistry for InMemoryRegistry {
    fn count_by_name(&self, name: &str) -> Result<u64, RegistryError> {
        Ok(self.counts().get(name).copied().unwrap_or(0))
    }

    fn record(&self, name: &str) -> Result<(), RegistryError> {
        *self.counts().entry(name.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
