//! Trait definitions for external generation services.

use async_trait::async_trait;
use storyboard_core::{AspectRatio, CharacterProfile, ImageData, ReferenceImage};
use storyboard_error::ImageApiError;

/// A service that turns a prompt into an image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image.
    ///
    /// `Ok(None)` means the call succeeded but carried no image data. Callers
    /// treat that as a soft failure, not an error.
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        references: &[ReferenceImage],
    ) -> Result<Option<ImageData>, ImageApiError>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier used for images.
    fn model_name(&self) -> &str;
}

/// A text model that reads scripts and reference images.
#[async_trait]
pub trait ScriptAnalyzer: Send + Sync {
    /// Extract the main characters of a script.
    ///
    /// With `as_animals`, each character is recast as a cute animal whose
    /// species fits the role.
    async fn analyze_characters(
        &self,
        script: &str,
        as_animals: bool,
    ) -> Result<Vec<CharacterProfile>, ImageApiError>;

    /// Split a script into `count` short scene captions.
    async fn analyze_scenes(&self, script: &str, count: usize)
    -> Result<Vec<String>, ImageApiError>;

    /// Describe the face and appearance in a reference image.
    async fn describe_reference(&self, image: &ImageData) -> Result<String, ImageApiError>;
}
