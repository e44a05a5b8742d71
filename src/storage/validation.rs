//! Path validation
//!
//! Storage paths are relative, slash-separated keys. Anything that could
//! escape the backend root is rejected before it reaches the disk.

use std::path::{Component, Path};

use crate::error::StorageError;

/// Validate that a storage path is safe to hand to a backend.
pub fn validate_storage_path(path: &str) -> Result<&str, StorageError> {
    if path.is_empty() || path.ends_with('/') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    if path.contains('\0') || path.contains('\r') || path.contains('\n') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    if !is_safe_path(Path::new(path)) {
        return Err(StorageError::PathTraversal(path.to_string()));
    }

    Ok(path)
}

/// Validate that a path has no root, prefix or parent components
pub fn is_safe_path(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
