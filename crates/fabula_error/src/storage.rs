//! Artifact storage error types.

/// Kinds of artifact storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a story folder
    #[display("Failed to create story folder: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write an artifact file
    #[display("Failed to write artifact: {}", _0)]
    FileWrite(String),
    /// Failed to read an artifact file
    #[display("Failed to read artifact: {}", _0)]
    FileRead(String),
    /// Artifact not found at the specified location
    #[display("Artifact not found: {}", _0)]
    NotFound(String),
    /// Invalid artifact path
    #[display("Invalid artifact path: {}", _0)]
    InvalidPath(String),
    /// Unrecognized artifact kind name
    #[display("Unknown artifact kind: {}", _0)]
    UnknownKind(String),
}

/// Artifact storage error with location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("prose.json".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
