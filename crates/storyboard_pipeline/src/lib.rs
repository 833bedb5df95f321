//! Sequential persona and storyboard generation.
//!
//! Items are generated strictly one at a time, in input order, with a fixed
//! pause between them. Each item gets a retried primary call and, if that
//! fails or comes back empty, exactly one simplified fallback call. Failed
//! items never stop the batch; the [`aggregate`] step decides whether they
//! are dropped (personas) or kept as empty placeholders (scenes).
//!
//! # Example
//!
//! ```no_run
//! use storyboard_core::StyleParams;
//! use storyboard_models::GeminiClient;
//! use storyboard_pipeline::{PersonaOptions, PersonaPipeline, PipelineContext};
//! use storyboard_rate_limit::StoryboardConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoryboardConfig::load()?;
//! let client = GeminiClient::from_env(config.gemini.clone())?;
//! let context = PipelineContext::new(config);
//!
//! let pipeline = PersonaPipeline::new(&client, &client, &context);
//! let outcome = pipeline
//!     .generate("Minji runs a tiny cafe in Busan.", &PersonaOptions::default())
//!     .await?;
//! println!("{}", outcome.status_message());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod batch;
mod composer;
mod context;
mod fallback;
mod persona;
mod regenerate;
mod requests;
mod safety;
mod script;
mod storyboard;

pub use aggregate::aggregate;
pub use batch::{BatchGenerator, ItemOutcome};
pub use composer::{aspect_ratio_instruction, compose_prompt};
pub use context::{CancellationFlag, PipelineContext};
pub use fallback::{FallbackImage, fallback, fallback_prompt};
pub use persona::{PersonaOptions, PersonaPipeline};
pub use regenerate::{regenerate_persona, regenerate_scene};
pub use requests::{persona_request, scene_request};
pub use safety::replace_unsafe_words;
pub use script::{extract_sequence_descriptions, is_sequence_format};
pub use storyboard::{MAX_SCENES, SceneOptions, StoryboardPipeline, validate_scene_count};
