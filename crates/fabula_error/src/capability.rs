//! Generation capability error types.

use std::time::Duration;

/// Specific error conditions for generation capability calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CapabilityErrorKind {
    /// The provider signalled a rate limit with a retry-after duration
    #[display("Rate limited, retry after {}ms", retry_after_ms)]
    RateLimited {
        /// Milliseconds to wait before retrying
        retry_after_ms: u64,
    },
    /// Generated output failed schema validation
    #[display("Malformed output for '{}': {}", kind, violation)]
    MalformedOutput {
        /// Artifact kind the output was supposed to match
        kind: String,
        /// Description of the validation violation
        violation: String,
    },
    /// The underlying provider call failed
    #[display("Provider error: {}", _0)]
    Provider(String),
    /// The model does not implement the repair path
    #[display("Output repair not supported by '{}'", _0)]
    RepairNotSupported(String),
}

/// Error type for generation capability operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{CapabilityError, CapabilityErrorKind};
/// use std::time::Duration;
///
/// let err = CapabilityError::rate_limited(Duration::from_secs(30));
/// assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Capability Error: {} at line {} in {}", kind, line, file)]
pub struct CapabilityError {
    /// The specific error condition
    pub kind: CapabilityErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CapabilityError {
    /// Create a new CapabilityError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CapabilityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a rate-limit error carrying the provider's retry-after duration.
    #[track_caller]
    pub fn rate_limited(retry_after: Duration) -> Self {
        Self::new(CapabilityErrorKind::RateLimited {
            retry_after_ms: retry_after.as_millis() as u64,
        })
    }

    /// The retry-after duration, if this is a rate-limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            CapabilityErrorKind::RateLimited { retry_after_ms } => {
                Some(Duration::from_millis(*retry_after_ms))
            }
            _ => None,
        }
    }
}
