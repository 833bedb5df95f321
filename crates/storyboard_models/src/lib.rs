//! Gemini provider integration for Storyboard.
//!
//! [`GeminiClient`] implements both
//! [`ImageGenerator`](storyboard_interface::ImageGenerator) and
//! [`ScriptAnalyzer`](storyboard_interface::ScriptAnalyzer) over the
//! `generateContent` REST endpoint.
//!
//! # Example
//!
//! ```no_run
//! use storyboard_core::AspectRatio;
//! use storyboard_interface::ImageGenerator;
//! use storyboard_models::GeminiClient;
//! use storyboard_rate_limit::GeminiConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env(GeminiConfig::default())?;
//! let image = client
//!     .generate_image("A lighthouse at dusk", AspectRatio::Landscape, &[])
//!     .await?;
//! println!("Got image: {}", image.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod metrics;

pub use gemini::{
    Candidate, Content, GeminiClient, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, ImageConfig, InlineData, Part, PromptFeedback, extract_json,
};
pub use metrics::ImageMetrics;
