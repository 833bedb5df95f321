//! Image API error types and retry classification.

/// Error conditions reported by the generative image/text service.
///
/// Classification happens once, where the HTTP response is decoded, so the
/// rest of the pipeline matches on a kind instead of searching message text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ImageApiErrorKind {
    /// API key not found in environment or configuration
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// The service rejected the credential
    #[display("API key rejected: {}", _0)]
    InvalidApiKey(String),
    /// Failed to build the HTTP client
    #[display("Failed to create client: {}", _0)]
    ClientCreation(String),
    /// Request rate or quota exhausted
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Service overloaded or temporarily unavailable
    #[display("Service temporarily unavailable (HTTP {}): {}", status_code, message)]
    Unavailable {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Prompt or output blocked by the provider's safety filter
    #[display("Content blocked by safety filter: {}", _0)]
    ContentBlocked(String),
    /// Any other HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Connection-level failure (DNS, TLS, timeout)
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// Response body did not match the expected shape
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Base64 decoding of inline image data failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
}

impl ImageApiErrorKind {
    /// Classify an HTTP failure from its status code and the provider's
    /// status string (`RESOURCE_EXHAUSTED`, `UNAVAILABLE`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::ImageApiErrorKind;
    ///
    /// let kind = ImageApiErrorKind::from_status(429, Some("RESOURCE_EXHAUSTED"), "quota");
    /// assert!(matches!(kind, ImageApiErrorKind::RateLimited(_)));
    /// assert!(kind.is_retryable());
    ///
    /// let kind = ImageApiErrorKind::from_status(400, Some("INVALID_ARGUMENT"), "bad field");
    /// assert!(!kind.is_retryable());
    /// ```
    pub fn from_status(status_code: u16, status: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match (status_code, status) {
            (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => Self::RateLimited(message),
            (502..=504, _) | (_, Some("UNAVAILABLE")) => Self::Unavailable {
                status_code,
                message,
            },
            (401 | 403, _) | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => {
                Self::InvalidApiKey(message)
            }
            // Gemini reports a bad key as 400 INVALID_ARGUMENT with reason API_KEY_INVALID.
            (400, _) if message.contains("API_KEY_INVALID") => Self::InvalidApiKey(message),
            _ => Self::HttpError {
                status_code,
                message,
            },
        }
    }

    /// Check if this error should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Unavailable { .. })
    }

    /// Check if this error invalidates the whole request rather than one item.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::InvalidApiKey(_))
    }

    /// Short, stable label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "missing_api_key",
            Self::InvalidApiKey(_) => "invalid_api_key",
            Self::ClientCreation(_) => "client_creation",
            Self::RateLimited(_) => "rate_limited",
            Self::Unavailable { .. } => "unavailable",
            Self::ContentBlocked(_) => "content_blocked",
            Self::HttpError { .. } => "http",
            Self::Transport(_) => "transport",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Base64Decode(_) => "base64_decode",
        }
    }
}

/// Image API error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ImageApiError, ImageApiErrorKind};
///
/// let err = ImageApiError::new(ImageApiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Image API Error: {} at line {} in {}", kind, line, file)]
pub struct ImageApiError {
    /// The kind of error that occurred
    pub kind: ImageApiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ImageApiError {
    /// Create a new ImageApiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ImageApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ImageApiError, ImageApiErrorKind, RetryableError};
///
/// let err = ImageApiError::new(ImageApiErrorKind::Unavailable {
///     status_code: 503,
///     message: "The model is overloaded".to_string(),
/// });
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors (overload, rate limit) return true. Everything else,
    /// including safety blocks and bad requests, returns false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ImageApiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
