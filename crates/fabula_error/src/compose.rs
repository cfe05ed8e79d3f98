//! Stage composition error types.

/// Specific error conditions for stage composition.
///
/// A field collision is a programming-contract violation: stages add exactly
/// one new field each, so finding the new field already populated means two
/// code paths tried to produce the same stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ComposeErrorKind {
    /// The field a stage would add is already present on the composed record
    #[display("Field '{}' already present on composed record", _0)]
    FieldCollision(String),
    /// A required earlier-stage field is missing from the composed record
    #[display("Field '{}' missing from composed record", _0)]
    MissingField(String),
}

/// Error type for stage composition.
///
/// # Examples
///
/// ```
/// use fabula_error::{ComposeError, ComposeErrorKind};
///
/// let err = ComposeError::new(ComposeErrorKind::FieldCollision("prose".to_string()));
/// assert!(format!("{}", err).contains("already present"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Compose Error: {} at line {} in {}", kind, line, file)]
pub struct ComposeError {
    /// The specific error condition
    pub kind: ComposeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ComposeError {
    /// Create a new ComposeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ComposeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
