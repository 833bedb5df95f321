//! Per-item failure records.

use serde::{Deserialize, Serialize};
use storyboard_error::ImageApiErrorKind;

/// Why an item ended without an image.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service answered without image data
    #[display("empty payload")]
    EmptyPayload,
    /// Quota or rate limit
    #[display("rate limited")]
    RateLimited,
    /// Service overloaded
    #[display("service unavailable")]
    Unavailable,
    /// Safety filter
    #[display("content blocked")]
    ContentBlocked,
    /// Retryable error persisted through every attempt
    #[display("max retries exceeded")]
    MaxRetriesExceeded,
    /// Any other request failure
    #[display("request failed")]
    Request,
    /// Batch cancelled before this item ran
    #[display("cancelled")]
    Cancelled,
}

impl From<&ImageApiErrorKind> for FailureKind {
    fn from(kind: &ImageApiErrorKind) -> Self {
        match kind {
            ImageApiErrorKind::RateLimited(_) => Self::RateLimited,
            ImageApiErrorKind::Unavailable { .. } => Self::Unavailable,
            ImageApiErrorKind::ContentBlocked(_) => Self::ContentBlocked,
            _ => Self::Request,
        }
    }
}

/// An item that produced no image.
///
/// # Examples
///
/// ```
/// use storyboard_core::{FailureKind, ItemFailure};
///
/// let failure = ItemFailure {
///     position: 2,
///     subject_id: "scene-3".to_string(),
///     subject_name: "Scene 3".to_string(),
///     error_kind: FailureKind::EmptyPayload,
///     message: "No image data returned".to_string(),
/// };
/// assert_eq!(failure.to_string(), "#3 Scene 3: empty payload (No image data returned)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display("#{} {}: {} ({})", position + 1, subject_name, error_kind, message)]
pub struct ItemFailure {
    /// Zero-based position in the batch
    pub position: usize,
    /// Subject identifier
    pub subject_id: String,
    /// Subject display name
    pub subject_name: String,
    /// Failure category
    pub error_kind: FailureKind,
    /// Last error message
    pub message: String,
}
