//! Invoice file store
//!
//! Folder-scoped storage with collision-free name generation.

pub mod file_store;
pub mod profile;
pub mod results;

pub use file_store::FileStore;
pub use profile::{InvoiceProfile, StorageProfile, open_backend};
pub use results::{SaveOutcome, SaveRejection};
