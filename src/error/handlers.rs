//! Error handlers
//!
//! Logging and response-code mapping for store errors.

use crate::error::types::{RegistryError, StorageError, StoreError};
use log::error;

/// Log a store error
pub fn handle_error(err: &StoreError) {
    error!("Invoice store error: {}", err);
}

/// Convert a store error to an endpoint response code
pub fn error_to_status_code(err: &StoreError) -> u16 {
    match err {
        StoreError::Storage(StorageError::InvalidPath(_)) => 553,
        StoreError::Storage(StorageError::PathTraversal(_)) => 553,
        StoreError::Storage(StorageError::FileNotFound(_)) => 550,
        StoreError::Storage(StorageError::IoError(_)) => 451,
        StoreError::Registry(RegistryError::Unavailable(_)) => 421,
        StoreError::Registry(RegistryError::IoError(_)) => 451,
        StoreError::NameSpaceExhausted { .. } => 452,
    }
}
