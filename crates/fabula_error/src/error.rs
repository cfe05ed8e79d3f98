//! Top-level error wrapper types.

use crate::{
    CapabilityError, ComposeError, ConfigError, JsonError, PipelineError, ResumeError,
    StorageError,
};

/// This is the foundation error enum for the Fabula workspace.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, JsonError};
///
/// let json_err = JsonError::new("unexpected end of input");
/// let err: FabulaError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Stage composition error
    #[from(ComposeError)]
    Compose(ComposeError),
    /// Generation capability error
    #[from(CapabilityError)]
    Capability(CapabilityError),
    /// Pipeline orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Resume detection error
    #[from(ResumeError)]
    Resume(ResumeError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, ConfigError};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }

    /// The capability error, if this wraps one.
    pub fn as_capability(&self) -> Option<&CapabilityError> {
        match self.kind() {
            FabulaErrorKind::Capability(e) => Some(e),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
///
/// fn load_brief() -> FabulaResult<String> {
///     Err(StorageError::new(StorageErrorKind::NotFound("brief.json".to_string())))?
/// }
/// ```
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
