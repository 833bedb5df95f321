//! Storyboard (scene) generation.

use crate::{
    BatchGenerator, PipelineContext, aggregate, extract_sequence_descriptions, is_sequence_format,
    scene_request,
};
use std::time::Duration;
use storyboard_core::{
    BatchOutcome, FailurePolicy, GeneratedItem, ImageData, ReferenceImage, StyleParams,
};
use storyboard_error::{
    ConfigError, GenerationError, GenerationErrorKind, StoryboardError, StoryboardResult,
};
use storyboard_interface::{BatchProgress, ImageGenerator, ScriptAnalyzer};
use storyboard_rate_limit::{StoryboardConfig, call_with_retry};
use tracing::{debug, info, instrument, warn};

/// Hard ceiling on scenes per storyboard.
pub const MAX_SCENES: usize = 20;

/// Reject a scene count outside `1..=min(max_scenes, MAX_SCENES)`.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::validate_scene_count;
/// use storyboard_rate_limit::StoryboardConfig;
///
/// let config = StoryboardConfig::default();
/// assert!(validate_scene_count(&config, 8).is_ok());
/// assert!(validate_scene_count(&config, 0).is_err());
/// assert!(validate_scene_count(&config, 25).is_err());
/// ```
pub fn validate_scene_count(
    config: &StoryboardConfig,
    scene_count: usize,
) -> Result<(), ConfigError> {
    let limit = config.batch.max_scenes.min(MAX_SCENES);
    if (1..=limit).contains(&scene_count) {
        Ok(())
    } else {
        Err(ConfigError::new(format!(
            "Scene count must be between 1 and {}, got {}",
            limit, scene_count
        )))
    }
}

/// Options for a storyboard run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneOptions {
    /// Style applied to every scene
    pub style_params: StyleParams,
    /// Image whose look every scene should match
    pub style_reference: Option<ImageData>,
}

/// Generates one image per scene of a script.
pub struct StoryboardPipeline<'a, G: ?Sized, A: ?Sized> {
    generator: &'a G,
    analyzer: &'a A,
    context: &'a PipelineContext,
}

impl<'a, G, A> StoryboardPipeline<'a, G, A>
where
    G: ImageGenerator + ?Sized,
    A: ScriptAnalyzer + ?Sized,
{
    /// Creates a storyboard pipeline.
    pub fn new(generator: &'a G, analyzer: &'a A, context: &'a PipelineContext) -> Self {
        Self {
            generator,
            analyzer,
            context,
        }
    }

    /// Largest scene count accepted by [`generate`](Self::generate).
    pub fn scene_limit(&self) -> usize {
        self.context.config().batch.max_scenes.min(MAX_SCENES)
    }

    /// Split `script` into `scene_count` scenes and generate an image for each.
    ///
    /// Every generated persona in `characters` is sent as a reference image
    /// so faces stay consistent. Failed scenes stay in `items` as empty-image
    /// entries, so the result always has one entry per scene.
    ///
    /// Scripts written as numbered lines (`1. ...`) are used as-is instead of
    /// being sent to the analyzer.
    ///
    /// # Errors
    ///
    /// - Configuration error when `scene_count` is outside `1..=scene_limit()`
    ///   or the script is empty; nothing is called in that case
    /// - Analysis error when no scenes could be extracted
    /// - Any error that aborts the batch (a rejected credential)
    #[instrument(skip(self, script, characters, options), fields(characters = characters.len()))]
    pub async fn generate(
        &self,
        script: &str,
        characters: &[GeneratedItem],
        scene_count: usize,
        options: &SceneOptions,
    ) -> StoryboardResult<BatchOutcome> {
        validate_scene_count(self.context.config(), scene_count)?;
        let script = script.trim();
        if script.is_empty() {
            return Err(ConfigError::new("Script is empty").into());
        }

        let scenes = self.scenes(script, scene_count).await?;
        info!(count = scenes.len(), "Scenes ready");

        let references = scene_references(options.style_reference.as_ref(), characters);
        let requests: Vec<_> = scenes
            .iter()
            .enumerate()
            .map(|(position, scene)| {
                scene_request(position, scene, &options.style_params, references.clone())
            })
            .collect();

        let delay = Duration::from_millis(self.context.config().batch.scene_delay_ms);
        let outcomes = BatchGenerator::new(self.generator, self.context)
            .generate_batch(&requests, delay)
            .await?;

        let outcome = aggregate(outcomes, FailurePolicy::Placeholder);
        info!(status = %outcome.status_message(), "Storyboard generation finished");
        Ok(outcome)
    }

    async fn scenes(&self, script: &str, scene_count: usize) -> StoryboardResult<Vec<String>> {
        let mut scenes = if is_sequence_format(script) {
            debug!("Script is a numbered sequence, skipping analysis");
            extract_sequence_descriptions(script)
        } else {
            self.context.emit(BatchProgress::Analyzing);
            let policy = self.context.config().analysis_retry;
            let analyzer = self.analyzer;
            call_with_retry(&policy, || analyzer.analyze_scenes(script, scene_count))
                .await
                .map_err(StoryboardError::from)?
                .into_iter()
                .map(|scene| scene.trim().to_string())
                .filter(|scene| !scene.is_empty())
                .collect()
        };

        if scenes.len() > scene_count {
            scenes.truncate(scene_count);
        } else if scenes.len() < scene_count {
            warn!(
                requested = scene_count,
                found = scenes.len(),
                "Fewer scenes than requested"
            );
        }

        if scenes.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::Analysis(
                "No scenes found in the script".to_string(),
            ))
            .into());
        }
        Ok(scenes)
    }
}

/// Style reference first, then one reference per persona that has an image.
pub(crate) fn scene_references(
    style: Option<&ImageData>,
    characters: &[GeneratedItem],
) -> Vec<ReferenceImage> {
    style
        .cloned()
        .map(ReferenceImage::style)
        .into_iter()
        .chain(characters.iter().filter_map(|character| {
            character
                .image_data
                .as_ref()
                .filter(|image| !image.is_empty())
                .map(|image| ReferenceImage::character(&character.subject_name, image.clone()))
        }))
        .collect()
}
