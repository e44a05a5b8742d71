//! Error types
//!
//! Defines domain-specific error types for the storage backend, the name
//! registry, the file store and the service binary.

use std::fmt;
use std::io;

/// Storage backend errors
#[derive(Debug)]
pub enum StorageError {
    FileNotFound(String),
    InvalidPath(String),
    PathTraversal(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::FileNotFound(p) => write!(f, "File not found: {}", p),
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StorageError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// Name registry errors
#[derive(Debug)]
pub enum RegistryError {
    Unavailable(String),
    IoError(io::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Unavailable(msg) => write!(f, "Registry unavailable: {}", msg),
            RegistryError::IoError(e) => write!(f, "Registry IO error: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<io::Error> for RegistryError {
    fn from(error: io::Error) -> Self {
        RegistryError::IoError(error)
    }
}

/// File store errors.
///
/// Only collaborator failures and an exhausted name space end up here. A
/// failed write or a failed post-write check is reported through
/// `SaveOutcome::Rejected` instead.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Registry(RegistryError),
    NameSpaceExhausted { attempts: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Storage(e) => write!(f, "Storage error: {}", e),
            StoreError::Registry(e) => write!(f, "Registry error: {}", e),
            StoreError::NameSpaceExhausted { attempts } => {
                write!(f, "No free file name found after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StorageError> for StoreError {
    fn from(error: StorageError) -> Self {
        StoreError::Storage(error)
    }
}

impl From<RegistryError> for StoreError {
    fn from(error: RegistryError) -> Self {
        StoreError::Registry(error)
    }
}

/// Top-level error for the service binary
#[derive(Debug)]
pub enum ServiceError {
    Config(config::ConfigError),
    Store(StoreError),
    IoError(io::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(e) => write!(f, "Configuration error: {}", e),
            ServiceError::Store(e) => write!(f, "Store error: {}", e),
            ServiceError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<config::ConfigError> for ServiceError {
    fn from(error: config::ConfigError) -> Self {
        ServiceError::Config(error)
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        ServiceError::Store(error)
    }
}

impl From<StorageError> for ServiceError {
    fn from(error: StorageError) -> Self {
        ServiceError::Store(StoreError::Storage(error))
    }
}

impl From<RegistryError> for ServiceError {
    fn from(error: RegistryError) -> Self {
        ServiceError::Store(StoreError::Registry(error))
    }
}

impl From<io::Error> for ServiceError {
    fn from(error: io::Error) -> Self {
        ServiceError::IoError(error)
    }
}
