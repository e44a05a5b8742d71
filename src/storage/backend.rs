//! Storage backend contract
//!
//! A byte store keyed by relative path. The file store only ever reaches the
//! backend through this trait, so disk, memory or object stores are
//! interchangeable.

use std::path::PathBuf;

use crate::error::StorageError;
use crate::naming::{DEFAULT_ALPHABET, FILE_NAME_LENGTH, NameSource, RandomNameGenerator};

/// An uploaded file: the name the client sent plus the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    original_name: String,
    contents: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            contents,
        }
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }

    /// Extension of the client-supplied name, without the dot.
    ///
    /// Returns an empty string when the name has no extension.
    pub fn client_original_extension(&self) -> &str {
        let base = self
            .original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.original_name);
        match base.rfind('.') {
            Some(idx) => &base[idx + 1..],
            None => "",
        }
    }
}

/// Joins a folder and a file name with exactly one separator.
pub fn join_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

pub trait StorageBackend: Send + Sync {
    /// True iff an object is stored at `path`.
    fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Creates or overwrites the object at `path`.
    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError>;

    /// Reads the object at `path`. Fails with `FileNotFound` if absent.
    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Stores an uploaded file as `folder/name` and returns the stored path.
    fn put_file_as(
        &self,
        folder: &str,
        file: &UploadedFile,
        name: &str,
    ) -> Result<String, StorageError> {
        let path = join_path(folder, name);
        self.put(&path, file.contents())?;
        Ok(path)
    }

    /// Stores an uploaded file under a backend-chosen random name.
    fn put_file(&self, folder: &str, file: &UploadedFile) -> Result<String, StorageError> {
        let mut name = RandomNameGenerator::new().generate(FILE_NAME_LENGTH, DEFAULT_ALPHABET);
        let ext = file.client_original_extension();
        if !ext.is_empty() {
            name.push('.');
            name.push_str(ext);
        }
        self.put_file_as(folder, file, &name)
    }

    /// Location of the object on local disk, for backends that have one.
    fn absolute_path(&self, _path: &str) -> Option<PathBuf> {
        None
    }
}
