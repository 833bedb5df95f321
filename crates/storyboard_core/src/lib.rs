//! Core data types for the Storyboard generation pipeline.
//!
//! Requests describe one image to generate, items and failures describe what
//! came back, and [`BatchOutcome`] ties a whole sequential run together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod failure;
mod item;
mod outcome;
mod request;
mod style;

pub use character::CharacterProfile;
pub use failure::{FailureKind, ItemFailure};
pub use item::{GeneratedItem, ImageData, WordReplacement};
pub use outcome::{BatchOutcome, FailurePolicy, OutcomeSummary};
pub use request::{GenerationRequest, ReferenceImage, ReferenceKind, SubjectKind};
pub use style::{AspectRatio, Composition, Style, StyleParams, StyleParamsBuilder};
