//! Store result types
//!
//! Defines the outcome of a save.

/// Why a save was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRejection {
    /// The backend reported a failed write. The file may or may not exist.
    WriteFailed,
    /// The write reported success but the file could not be found after.
    VerificationFailed,
}

/// Result of `FileStore::save_file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Accepted(String),
    Rejected(SaveRejection),
}

impl SaveOutcome {
    /// The accepted name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            SaveOutcome::Accepted(name) => Some(name),
            SaveOutcome::Rejected(_) => None,
        }
    }

    pub fn into_name(self) -> Option<String> {
        match self {
            SaveOutcome::Accepted(name) => Some(name),
            SaveOutcome::Rejected(_) => None,
        }
    }
}
