//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, ImageApiError, StorageError};

/// Every error the workspace can surface to a caller.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ConfigError, StoryboardError};
///
/// let err: StoryboardError = ConfigError::new("scene count 25 exceeds 20").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryboardErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// External image/text API error
    #[from(ImageApiError)]
    ImageApi(ImageApiError),
    /// Batch-level generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Output storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Storyboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ConfigError, StoryboardErrorKind, StoryboardResult};
///
/// fn might_fail() -> StoryboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), StoryboardErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {}", _0)]
pub struct StoryboardError(Box<StoryboardErrorKind>);

impl StoryboardError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryboardErrorKind {
        &self.0
    }

    /// True when the error means the whole request is malformed.
    pub fn is_configuration(&self) -> bool {
        match self.kind() {
            StoryboardErrorKind::Config(_) => true,
            StoryboardErrorKind::ImageApi(e) => e.kind.is_credential_error(),
            _ => false,
        }
    }
}

impl<T> From<T> for StoryboardError
where
    T: Into<StoryboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyboard operations.
pub type StoryboardResult<T> = std::result::Result<T, StoryboardError>;
