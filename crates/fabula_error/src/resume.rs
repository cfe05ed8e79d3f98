//! Resume detection error types.

/// Specific error conditions for resume detection.
///
/// The detector never guesses: a folder that cannot be unambiguously mapped
/// to a pipeline stage is reported, not silently classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ResumeErrorKind {
    /// The story folder holds no resumable artifact
    #[display("No resumable artifact in '{}'", _0)]
    NoArtifacts(String),
    /// A legacy artifact cannot be unambiguously mapped to a stage
    #[display("Ambiguous artifact '{}': {}", artifact, message)]
    AmbiguousArtifact {
        /// The artifact file that could not be classified
        artifact: String,
        /// Why classification failed
        message: String,
    },
    /// A persisted artifact failed to deserialize
    #[display("Corrupt artifact '{}': {}", artifact, message)]
    CorruptArtifact {
        /// The artifact file that failed to parse
        artifact: String,
        /// Parse error message
        message: String,
    },
}

/// Error type for resume detection.
///
/// # Examples
///
/// ```
/// use fabula_error::{ResumeError, ResumeErrorKind};
///
/// let err = ResumeError::new(ResumeErrorKind::NoArtifacts("stories/frog".to_string()));
/// assert!(format!("{}", err).contains("No resumable artifact"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Resume Error: {} at line {} in {}", kind, line, file)]
pub struct ResumeError {
    /// The specific error condition
    pub kind: ResumeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ResumeError {
    /// Create a new ResumeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ResumeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
