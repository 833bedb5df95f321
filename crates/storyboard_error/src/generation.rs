//! Batch-level generation errors.

use crate::ImageApiError;

/// Generation failures that escape a single item.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GenerationErrorKind {
    /// A retryable error persisted through every allowed attempt
    #[display("Max retries exceeded after {} attempts: {}", attempts, last_error)]
    MaxRetriesExceeded {
        /// Number of attempts made
        attempts: usize,
        /// The error from the final attempt
        last_error: ImageApiError,
    },
    /// Every item of a batch failed
    #[display(
        "All {} {} failed to generate. Check the API key or simplify the script. Failures: {}",
        requested,
        label,
        summary
    )]
    TotalFailure {
        /// What was being generated ("personas", "scenes")
        label: String,
        /// Number of items requested
        requested: usize,
        /// One line per failed item
        summary: String,
    },
    /// Script analysis produced nothing usable
    #[display("Script analysis failed: {}", _0)]
    Analysis(String),
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Analysis("no characters".to_string()));
/// assert!(format!("{}", err).contains("no characters"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
