//! Storage backends
//!
//! The backend contract plus the local disk and in-memory implementations.

pub mod backend;
pub mod local;
pub mod memory;
pub mod validation;

pub use backend::{StorageBackend, UploadedFile, join_path};
pub use local::LocalDiskBackend;
pub use memory::InMemoryBackend;
pub use validation::validate_storage_path;
