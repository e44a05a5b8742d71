//! Ledger file registry
//!
//! Persists records as an append-only text file, one file name per line.

use log::info;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::RegistryError;
use crate::registry::NameRegistry;

#[derive(Debug)]
pub struct LedgerFileRegistry {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl LedgerFileRegistry {
    /// Opens the ledger, creating its parent directory if needed.
    /// The file itself is created on the first record.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        info!("Name registry ledger: {}", path.display());
        Ok(Self {
            path,
            append_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NameRegistry for LedgerFileRegistry {
    fn count_by_name(&self, name: &str) -> Result<u64, RegistryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(RegistryError::from(e)),
        };
        Ok(contents.lines().filter(|line| *line == name).count() as u64)
    }

    fn record(&self, name: &str) -> Result<(), RegistryError> {
        if name.is_empty() || name.contains(['\n', '\r']) {
            return Err(RegistryError::IoError(io::Error::new(
                ErrorKind::InvalidInput,
                format!("Cannot record file name {:?}", name),
            )));
        }

        let _guard = self.append_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", name)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_ledger_counts_zero() {
        let dir = tempdir().unwrap();
        let registry = LedgerFileRegistry::open(dir.path().join("db/names.txt")).unwrap();
        assert_eq!(registry.count_by_name("a.pdf").unwrap(), 0);
    }

    #[test]
    fn test_records_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("names.txt");

        let registry = LedgerFileRegistry::open(&path).unwrap();
        registry.record("a.pdf").unwrap();
        registry.record("b.pdf").unwrap();
        registry.record("a.pdf").unwrap();

        let reopened = LedgerFileRegistry::open(&path).unwrap();
        assert_eq!(reopened.count_by_name("a.pdf").unwrap(), 2);
        assert_eq!(reopened.count_by_name("b.pdf").unwrap(), 1);
        assert_eq!(reopened.count_by_name("a").unwrap(), 0);
    }

    #[test]
    fn test_rejects_multiline_names() {
        let dir = tempdir().unwrap();
        let registry = LedgerFileRegistry::open(dir.path().join("names.txt")).unwrap();
        assert!(registry.record("a.pdf\nb.pdf").is_err());
        assert!(registry.record("").is_err());
    }
}
