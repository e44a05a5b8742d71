//! Random name generation
//!
//! Produces random base names drawn uniformly from an alphabet. The
//! generator guarantees nothing about uniqueness on its own; that is the
//! resolver's job.

use rand::Rng;

/// Digits, lowercase and uppercase ASCII letters (62 symbols).
pub const DEFAULT_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length used for generic random strings such as session ids.
pub const DEFAULT_LENGTH: usize = 10;

/// Source of candidate base names.
///
/// The resolver only talks to this trait, so a scripted source can stand in
/// for the random one.
pub trait NameSource: Send + Sync {
    /// Returns a string of exactly `length` characters taken from `alphabet`.
    /// An empty `alphabet` selects [`DEFAULT_ALPHABET`].
    fn generate(&self, length: usize, alphabet: &str) -> String;
}

/// Thread-local, OS-seeded random generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNameGenerator;

impl RandomNameGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Random string of [`DEFAULT_LENGTH`] characters from the default alphabet.
    pub fn generate_default(&self) -> String {
        self.generate(DEFAULT_LENGTH, DEFAULT_ALPHABET)
    }
}

impl NameSource for RandomNameGenerator {
    fn generate(&self, length: usize, alphabet: &str) -> String {
        let alphabet = if alphabet.is_empty() {
            DEFAULT_ALPHABET
        } else {
            alphabet
        };
        let symbols: Vec<char> = alphabet.chars().collect();
        let mut rng = rand::rng();

        (0..length)
            .map(|_| symbols[rng.random_range(0..symbols.len())])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_exact_length() {
        let generator = RandomNameGenerator::new();
        assert_eq!(generator.generate(40, DEFAULT_ALPHABET).chars().count(), 40);
        assert_eq!(generator.generate_default().len(), DEFAULT_LENGTH);
        assert!(generator.generate(0, DEFAULT_ALPHABET).is_empty());
    }

    #[test]
    fn test_generate_uses_only_alphabet() {
        let generator = RandomNameGenerator::new();
        let name = generator.generate(200, "ab");
        assert!(name.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn test_empty_alphabet_falls_back_to_default() {
        let generator = RandomNameGenerator::new();
        let name = generator.generate(100, "");
        assert_eq!(name.len(), 100);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_single_symbol_alphabet() {
        let generator = RandomNameGenerator::new();
        assert_eq!(generator.generate(5, "z"), "zzzzz");
    }

    #[test]
    fn test_long_names_do_not_repeat() {
        let generator = RandomNameGenerator::new();
        let names: HashSet<String> = (0..1000)
            .map(|_| generator.generate(40, DEFAULT_ALPHABET))
            .collect();
        assert_eq!(names.len(), 1000);
    }
}
