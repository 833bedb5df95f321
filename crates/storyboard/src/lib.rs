//! Storyboard - persona and scene images from a script
//!
//! Storyboard reads a script, extracts its characters or scenes with a text
//! model, and generates one image per item with an image model. Items are
//! generated one at a time with fixed pauses, transient errors are retried
//! with exponential backoff, and every item gets exactly one simplified
//! fallback attempt before it is reported as failed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use storyboard::{
//!     GeminiClient, PersonaOptions, PersonaPipeline, PipelineContext, SceneOptions,
//!     StoryboardConfig, StoryboardPipeline,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryboardConfig::load()?;
//!     let client = GeminiClient::from_env(config.gemini.clone())?;
//!     let context = PipelineContext::new(config);
//!
//!     let script = std::fs::read_to_string("script.txt")?;
//!     let personas = PersonaPipeline::new(&client, &client, &context)
//!         .generate(&script, &PersonaOptions::default())
//!         .await?;
//!
//!     let scenes = StoryboardPipeline::new(&client, &client, &context)
//!         .generate(&script, &personas.items, 8, &SceneOptions::default())
//!         .await?;
//!     println!("{}", scenes.status_message());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyboard_error` - Error types
//! - `storyboard_core` - Requests, items, outcomes, style parameters
//! - `storyboard_interface` - `ImageGenerator` and `ScriptAnalyzer` traits
//! - `storyboard_rate_limit` - Retry, throttling and configuration
//! - `storyboard_models` - Gemini REST client
//! - `storyboard_pipeline` - Prompt composition, batching, fallback, aggregation
//!
//! This crate re-exports everything for convenience and adds the output
//! directory format used by the CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod observability;
mod output;

pub use output::{Manifest, ManifestEntry, OutputDirectory};

pub use storyboard_core::*;
pub use storyboard_error::*;
pub use storyboard_interface::*;
pub use storyboard_models::{GeminiClient, ImageMetrics};
pub use storyboard_pipeline::*;
pub use storyboard_rate_limit::*;
