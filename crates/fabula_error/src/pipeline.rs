//! Pipeline orchestration error types.

/// Specific error conditions for pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// A stage failed; carries enough context to resume precisely
    #[display("Stage '{}' failed{}: {}",
        stage,
        page.map(|p| format!(" at page {}", p)).unwrap_or_default(),
        message)]
    StageFailed {
        /// Name of the stage that failed
        stage: String,
        /// Page number within the stage, for per-page stages
        page: Option<u32>,
        /// Underlying error message
        message: String,
    },
    /// A per-page array came back with the wrong length or ordering
    #[display("Page sequence invalid for '{}': {}", stage, message)]
    PageSequence {
        /// Name of the stage whose pages are invalid
        stage: String,
        /// Description of the sequencing violation
        message: String,
    },
    /// The pipeline was asked to run past its terminal stage
    #[display("Pipeline already complete for story '{}'", _0)]
    AlreadyComplete(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::stage_failed("prose", Some(3), "model timed out");
/// assert!(format!("{}", err).contains("page 3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a stage-failure error with stage and page context.
    #[track_caller]
    pub fn stage_failed(
        stage: impl Into<String>,
        page: Option<u32>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(PipelineErrorKind::StageFailed {
            stage: stage.into(),
            page,
            message: message.into(),
        })
    }
}
