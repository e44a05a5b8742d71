//! Local disk backend
//!
//! Stores objects as files under a root directory. Writes go to a uniquely
//! named temporary file in the target directory and are persisted over the
//! target once flushed, so a reader never sees a half-written invoice.

use log::{error, info, warn};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::error::StorageError;
use crate::storage::backend::StorageBackend;
use crate::storage::validation::validate_storage_path;
use tempfile::NamedTempFile;

const MAX_RETRIES: u64 = 3;

#[derive(Debug, Clone)]
pub struct LocalDiskBackend {
    root: PathBuf,
}

impl LocalDiskBackend {
    /// Creates the backend, making sure the root directory exists.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("Local storage root: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let path = validate_storage_path(path)?;
        Ok(self.root.join(path))
    }
}

impl StorageBackend for LocalDiskBackend {
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let file_path = self.resolve(path)?;
        match fs::metadata(&file_path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                error!("Failed to stat {} (real: {}): {}", path, file_path.display(), e);
                Err(StorageError::from(e))
            }
        }
    }

    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        let file_path = self.resolve(path)?;
        let parent = file_path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        // Dropping the temp file on an error path removes it
        let mut temp_file = NamedTempFile::new_in(parent)?;
        if let Err(e) = temp_file.write_all(contents).and_then(|_| temp_file.flush()) {
            error!("Failed to write temporary file for {}: {}", path, e);
            return Err(StorageError::from(e));
        }

        if let Err(e) = temp_file.persist(&file_path) {
            error!("Failed to persist {} (real: {}): {}", path, file_path.display(), e.error);
            return Err(StorageError::from(e.error));
        }

        info!("Stored {} ({} bytes)", path, contents.len());
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let file_path = self.resolve(path)?;
        match fs::read(&file_path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::FileNotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::from(e)),
        }
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let file_path = self.resolve(path)?;

        // Delete with retries for permission issues
        for attempt in 1..=MAX_RETRIES {
            match fs::remove_file(&file_path) {
                Ok(_) => {
                    info!("Deleted {} (real: {})", path, file_path.display());
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(StorageError::FileNotFound(path.to_string()));
                }
                Err(e) if attempt < MAX_RETRIES && e.kind() == ErrorKind::PermissionDenied => {
                    warn!(
                        "Delete of {} denied (attempt {}/{}), retrying",
                        path, attempt, MAX_RETRIES
                    );
                    thread::sleep(Duration::from_millis(100 * attempt));
                }
                Err(e) => {
                    error!("Failed to delete {} (real: {}): {}", path, file_path.display(), e);
                    return Err(StorageError::from(e));
                }
            }
        }

        Err(StorageError::IoError(std::io::Error::other(
            "Failed to delete file after retries",
        )))
    }

    fn absolute_path(&self, path: &str) -> Option<PathBuf> {
        self.resolve(path).ok()
    }
}
