//! Error types for the Storyboard generation pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! [`StoryboardError`] absorbs every wrapper through `From`, so `?` works
//! across crate boundaries.
//!
//! # Examples
//!
//! ```
//! use storyboard_error::{ImageApiError, ImageApiErrorKind, StoryboardResult};
//!
//! fn fetch_image() -> StoryboardResult<Vec<u8>> {
//!     Err(ImageApiError::new(ImageApiErrorKind::Transport("connection reset".into())))?
//! }
//!
//! assert!(fetch_image().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod image_api;
mod storage;

pub use config::ConfigError;
pub use error::{StoryboardError, StoryboardErrorKind, StoryboardResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use image_api::{ImageApiError, ImageApiErrorKind, RetryableError};
pub use storage::{StorageError, StorageErrorKind};
