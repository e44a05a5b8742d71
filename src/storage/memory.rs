//! In-memory backend
//!
//! Keeps objects in a map. Used by the `memory` storage driver and in tests.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::StorageError;
use crate::storage::backend::StorageBackend;
use crate::storage::validation::validate_storage_path;

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.read().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<u8>>> {
        self.objects.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<u8>>> {
        self.objects.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for InMemoryBackend {
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let path = validate_storage_path(path)?;
        Ok(self.read().contains_key(path))
    }

    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = validate_storage_path(path)?;
        self.write().insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let path = validate_storage_path(path)?;
        self.read()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let path = validate_storage_path(path)?;
        match self.write().remove(path) {
            Some(_) => Ok(()),
            None => Err(StorageError::FileNotFound(path.to_string())),
        }
    }
}
