//! Storage profiles
//!
//! A profile supplies everything that differs between kinds of stored
//! files: the folder they live in, the backend they are written to and the
//! registry lookup that decides whether a name is already in use. The file
//! store is written once against this trait.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{StorageDriver, StoreConfig, StoreSettings};
use crate::error::{RegistryError, ServiceError, StorageError};
use crate::registry::{InMemoryRegistry, LedgerFileRegistry, NameRegistry};
use crate::storage::{InMemoryBackend, LocalDiskBackend, StorageBackend};

pub trait StorageProfile: Send + Sync {
    /// Folder name, without a trailing separator.
    fn folder_name(&self) -> &str;

    fn backend(&self) -> &dyn StorageBackend;

    /// Whether the name registry already knows `name`.
    fn is_name_taken(&self, name: &str) -> Result<bool, RegistryError>;
}

/// Uploaded user invoices, stored under `user_invoices/`.
#[derive(Clone)]
pub struct InvoiceProfile {
    backend: Arc<dyn StorageBackend>,
    registry: Arc<dyn NameRegistry>,
}

impl InvoiceProfile {
    pub const FOLDER_NAME: &'static str = "user_invoices";

    pub fn new(backend: Arc<dyn StorageBackend>, registry: Arc<dyn NameRegistry>) -> Self {
        Self { backend, registry }
    }

    /// Builds the backend and registry the settings ask for.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, ServiceError> {
        let backend = open_backend(&settings.store_config(), settings.storage_root_path())?;

        let registry: Arc<dyn NameRegistry> = match &settings.registry_path {
            Some(path) => Arc::new(LedgerFileRegistry::open(path)?),
            None => Arc::new(InMemoryRegistry::new()),
        };

        Ok(Self::new(backend, registry))
    }

    pub fn registry(&self) -> &Arc<dyn NameRegistry> {
        &self.registry
    }
}

/// Opens the backend selected by the store's driver. `root` is only used by
/// the `local` driver.
pub fn open_backend(
    config: &StoreConfig,
    root: PathBuf,
) -> Result<Arc<dyn StorageBackend>, StorageError> {
    let backend: Arc<dyn StorageBackend> = match config.storage_driver {
        StorageDriver::Local => Arc::new(LocalDiskBackend::new(root)?),
        StorageDriver::Memory => Arc::new(InMemoryBackend::new()),
    };
    Ok(backend)
}

impl StorageProfile for InvoiceProfile {
    fn folder_name(&self) -> &str {
        Self::FOLDER_NAME
    }

    fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    fn is_name_taken(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.registry.count_by_name(name)? > 0)
    }
}
