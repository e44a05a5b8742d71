//! Name registry
//!
//! The persistent record of invoice file names, used as a second uniqueness
//! oracle next to the storage backend. The file store only ever counts; the
//! endpoint records names after a save is accepted.

pub mod ledger;
pub mod memory;

pub use ledger::LedgerFileRegistry;
pub use memory::InMemoryRegistry;

use crate::error::RegistryError;

pub trait NameRegistry: Send + Sync {
    /// Number of records referencing `name`.
    fn count_by_name(&self, name: &str) -> Result<u64, RegistryError>;

    /// Adds a record for `name`.
    fn record(&self, name: &str) -> Result<(), RegistryError>;
}
