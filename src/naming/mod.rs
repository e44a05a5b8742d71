//! File name generation
//!
//! Random base names and the loop that turns them into names free on both
//! the storage backend and the name registry.

pub mod generator;
pub mod resolver;

pub use generator::{DEFAULT_ALPHABET, DEFAULT_LENGTH, NameSource, RandomNameGenerator};
pub use resolver::UniqueNameResolver;

/// Base name length for stored files.
pub const FILE_NAME_LENGTH: usize = 40;

/// Upper bound on candidates drawn while resolving one name.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// How candidate names are drawn for a file store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    pub length: usize,
    /// Empty means [`DEFAULT_ALPHABET`].
    pub alphabet: String,
    pub max_attempts: usize,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            length: FILE_NAME_LENGTH,
            alphabet: DEFAULT_ALPHABET.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
