//! Layered TOML configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Bundled defaults (include_str! from storyboard.toml)
//! 2. `~/.config/storyboard/storyboard.toml`
//! 3. `./storyboard.toml`

use crate::RetryPolicy;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use storyboard_error::{ConfigError, StoryboardError, StoryboardResult};
use tracing::{debug, instrument};

/// Fallback prompt settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Wait before the fallback call, in milliseconds
    #[serde(default = "default_fallback_delay_ms")]
    pub delay_ms: u64,
    /// Retry policy for the fallback call itself
    #[serde(default = "RetryPolicy::no_retry")]
    pub retry: RetryPolicy,
}

fn default_fallback_delay_ms() -> u64 {
    1000
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_fallback_delay_ms(),
            retry: RetryPolicy::no_retry(),
        }
    }
}

/// Sequential batch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Wait between persona images, in milliseconds
    #[serde(default = "default_persona_delay_ms")]
    pub persona_delay_ms: u64,
    /// Wait between scene images, in milliseconds
    #[serde(default = "default_scene_delay_ms")]
    pub scene_delay_ms: u64,
    /// Largest scene count a caller may request
    #[serde(default = "default_max_scenes")]
    pub max_scenes: usize,
}

fn default_persona_delay_ms() -> u64 {
    2000
}

fn default_scene_delay_ms() -> u64 {
    3000
}

fn default_max_scenes() -> usize {
    20
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            persona_delay_ms: default_persona_delay_ms(),
            scene_delay_ms: default_scene_delay_ms(),
            max_scenes: default_max_scenes(),
        }
    }
}

/// Gemini endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for image generation
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Model used for script analysis
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Client-side request quota; unset or zero disables throttling
    #[serde(default)]
    pub requests_per_minute: Option<u32>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_model: default_image_model(),
            text_model: default_text_model(),
            requests_per_minute: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level Storyboard configuration.
///
/// # Example
///
/// ```no_run
/// use storyboard_rate_limit::StoryboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryboardConfig::load()?;
/// println!("Image model: {}", config.gemini.image_model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryboardConfig {
    /// Retry policy for image calls
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Retry policy for script analysis calls
    #[serde(default = "RetryPolicy::analysis")]
    pub analysis_retry: RetryPolicy,
    /// Fallback settings
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Batch settings
    #[serde(default)]
    pub batch: BatchConfig,
    /// Gemini endpoint
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl Default for StoryboardConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            analysis_retry: RetryPolicy::analysis(),
            fallback: FallbackConfig::default(),
            batch: BatchConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl StoryboardConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryboardResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> StoryboardResult<Self> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> StoryboardResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../storyboard.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyboard/storyboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyboard").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 || self.analysis_retry.max_attempts == 0 {
            return Err(ConfigError::new("max_attempts must be at least 1"));
        }
        if self.fallback.retry.max_attempts == 0 {
            return Err(ConfigError::new("fallback.retry.max_attempts must be at least 1"));
        }
        if self.batch.max_scenes == 0 {
            return Err(ConfigError::new("batch.max_scenes must be at least 1"));
        }
        if self.gemini.image_model.trim().is_empty() || self.gemini.text_model.trim().is_empty() {
            return Err(ConfigError::new("gemini model names must not be empty"));
        }
        Ok(())
    }
}
