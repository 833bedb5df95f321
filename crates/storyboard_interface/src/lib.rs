//! Trait definitions for the Storyboard generation pipeline.
//!
//! The pipeline only talks to the outside world through [`ImageGenerator`]
//! and [`ScriptAnalyzer`], so tests can swap in scripted mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{ImageGenerator, ScriptAnalyzer};
pub use types::{BatchProgress, ProgressObserver};
