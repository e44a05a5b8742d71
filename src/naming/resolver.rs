//! Unique name resolution
//!
//! Draws candidate names until one is free both on the storage backend and
//! in the name registry.
//!
//! The checks and the later write are not atomic. Two concurrent callers can
//! both be handed the same name if the generator happens to repeat itself
//! between the check and the write. At the default length of 40 symbols this
//! is negligible, and it is left as a known gap rather than serialized.

use log::debug;

use crate::error::StoreError;
use crate::naming::generator::NameSource;
use crate::naming::NamingPolicy;
use crate::store::StorageProfile;

pub struct UniqueNameResolver<'a, P: StorageProfile + ?Sized> {
    profile: &'a P,
    folder: &'a str,
    source: &'a dyn NameSource,
    policy: &'a NamingPolicy,
}

impl<'a, P: StorageProfile + ?Sized> UniqueNameResolver<'a, P> {
    /// `folder` is the folder scope with its trailing `/`.
    pub fn new(
        profile: &'a P,
        folder: &'a str,
        source: &'a dyn NameSource,
        policy: &'a NamingPolicy,
    ) -> Self {
        Self {
            profile,
            folder,
            source,
            policy,
        }
    }

    /// Returns `<base>.<extension>` that does not exist under the folder on
    /// the storage backend. An empty extension leaves a trailing dot.
    pub fn resolve_against_storage(
        &self,
        extension: &str,
        length: usize,
        alphabet: &str,
    ) -> Result<String, StoreError> {
        let mut budget = self.policy.max_attempts;
        self.draw_free_on_storage(extension, length, alphabet, &mut budget)
    }

    /// Returns a name free on the storage backend and unknown to the
    /// registry. A registry hit restarts from a fresh storage-checked name.
    ///
    /// Every candidate drawn, whichever check rejects it, counts against one
    /// `max_attempts` budget.
    pub fn resolve_against_registry(&self, extension: &str) -> Result<String, StoreError> {
        let mut budget = self.policy.max_attempts;
        loop {
            let candidate = self.draw_free_on_storage(
                extension,
                self.policy.length,
                &self.policy.alphabet,
                &mut budget,
            )?;

            if !self.profile.is_name_taken(&candidate)? {
                return Ok(candidate);
            }
            debug!(
                "Candidate {} already registered ({} attempts left)",
                candidate, budget
            );
        }
    }

    fn draw_free_on_storage(
        &self,
        extension: &str,
        length: usize,
        alphabet: &str,
        budget: &mut usize,
    ) -> Result<String, StoreError> {
        while *budget > 0 {
            *budget -= 1;
            let candidate = format!("{}.{}", self.source.generate(length, alphabet), extension);
            let path = format!("{}{}", self.folder, candidate);

            if !self.profile.backend().exists(&path)? {
                return Ok(candidate);
            }
            debug!("Candidate {} already stored ({} attempts left)", path, budget);
        }

        Err(StoreError::NameSpaceExhausted {
            attempts: self.policy.max_attempts,
        })
    }
}
