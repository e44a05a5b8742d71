//! File store
//!
//! Scopes every operation to the profile's folder and implements the save
//! protocol: resolve a free name, write, then confirm the file is there.

use log::{error, info, warn};
use std::path::PathBuf;

use crate::config::{StorageDriver, StoreConfig};
use crate::error::StoreError;
use crate::naming::{NameSource, NamingPolicy, RandomNameGenerator, UniqueNameResolver};
use crate::storage::UploadedFile;
use crate::store::profile::StorageProfile;
use crate::store::results::{SaveOutcome, SaveRejection};

pub struct FileStore<P: StorageProfile> {
    profile: P,
    folder: String,
    config: StoreConfig,
    naming: NamingPolicy,
    source: Box<dyn NameSource>,
}

impl<P: StorageProfile> FileStore<P> {
    pub fn new(profile: P, config: StoreConfig) -> Self {
        let folder = format!("{}/", profile.folder_name());
        Self {
            profile,
            folder,
            config,
            naming: NamingPolicy::default(),
            source: Box::new(RandomNameGenerator::new()),
        }
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Replaces the random name generator.
    pub fn with_name_source(mut self, source: Box<dyn NameSource>) -> Self {
        self.source = source;
        self
    }

    pub fn profile(&self) -> &P {
        &self.profile
    }

    pub fn storage_driver(&self) -> StorageDriver {
        self.config.storage_driver
    }

    /// Folder scope, including the trailing `/`.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn get_full_path(&self, name: &str) -> String {
        format!("{}{}", self.folder, name)
    }

    /// Public URL of a stored file. Plain concatenation, no encoding.
    pub fn get_uri_path(&self, name: &str) -> String {
        format!("{}/{}{}", self.config.public_domain, self.folder, name)
    }

    /// Location on local disk, when the backend has one.
    pub fn file_path(&self, name: &str) -> Option<PathBuf> {
        self.profile.backend().absolute_path(&self.get_full_path(name))
    }

    pub fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.profile.backend().exists(&self.get_full_path(name))?)
    }

    /// Writes raw bytes under the folder. Returns the backend's verdict.
    pub fn put(&self, name: &str, contents: &[u8]) -> bool {
        match self.profile.backend().put(&self.get_full_path(name), contents) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to put {}: {}", self.get_full_path(name), e);
                false
            }
        }
    }

    /// Stores the file under a backend-chosen name and returns the stored path.
    pub fn put_file(&self, file: &UploadedFile) -> Option<String> {
        match self.profile.backend().put_file(&self.folder, file) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Failed to store {} in {}: {}", file.original_name(), self.folder, e);
                None
            }
        }
    }

    /// Stores the file as `name` and returns the stored path.
    pub fn put_file_as(&self, file: &UploadedFile, name: &str) -> Option<String> {
        match self.profile.backend().put_file_as(&self.folder, file, name) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Failed to store {} as {}: {}", file.original_name(), name, e);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        Ok(self.profile.backend().get(&self.get_full_path(name))?)
    }

    pub fn delete(&self, name: &str) -> bool {
        match self.profile.backend().delete(&self.get_full_path(name)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to delete {}: {}", self.get_full_path(name), e);
                false
            }
        }
    }

    fn resolver(&self) -> UniqueNameResolver<'_, P> {
        UniqueNameResolver::new(&self.profile, &self.folder, self.source.as_ref(), &self.naming)
    }

    /// A name free on storage only, keeping the file's extension.
    pub fn file_name_for(
        &self,
        file: &UploadedFile,
        length: usize,
        alphabet: &str,
    ) -> Result<String, StoreError> {
        self.resolver()
            .resolve_against_storage(file.client_original_extension(), length, alphabet)
    }

    /// A name free on storage and in the registry, keeping the file's extension.
    pub fn unique_file_name(&self, file: &UploadedFile) -> Result<String, StoreError> {
        self.resolver()
            .resolve_against_registry(file.client_original_extension())
    }

    /// Saves an uploaded file.
    ///
    /// A non-empty `explicit_name` is used verbatim and skips name
    /// resolution. Otherwise a fresh unique name is drawn. The save is only
    /// accepted when the write succeeds and the file is found afterwards.
    /// Collaborator failures during name resolution are returned as `Err`.
    pub fn save_file(
        &self,
        file: &UploadedFile,
        explicit_name: &str,
    ) -> Result<SaveOutcome, StoreError> {
        let name = if explicit_name.is_empty() {
            self.unique_file_name(file)?
        } else {
            explicit_name.to_string()
        };

        if self.put_file_as(file, &name).is_none() {
            return Ok(SaveOutcome::Rejected(SaveRejection::WriteFailed));
        }

        match self.exists(&name) {
            Ok(true) => {
                info!(
                    "Saved {} as {} ({} bytes)",
                    file.original_name(),
                    self.get_full_path(&name),
                    file.size()
                );
                Ok(SaveOutcome::Accepted(name))
            }
            Ok(false) => {
                error!("{} missing after write", self.get_full_path(&name));
                Ok(SaveOutcome::Rejected(SaveRejection::VerificationFailed))
            }
            Err(e) => {
                error!("Could not verify {}: {}", self.get_full_path(&name), e);
                Ok(SaveOutcome::Rejected(SaveRejection::VerificationFailed))
            }
        }
    }

    /// Removes a stored file. Empty names and missing files count as
    /// success; otherwise the backend's delete result is returned.
    pub fn delete_image(&self, name: &str) -> bool {
        if name.is_empty() {
            return true;
        }

        match self.exists(name) {
            Ok(false) => true,
            Ok(true) => self.delete(name),
            Err(e) => {
                warn!("Could not check {} before delete: {}", self.get_full_path(name), e);
                false
            }
        }
    }
}
