//! Persona (character portrait) generation.

use crate::{BatchGenerator, PipelineContext, aggregate, persona_request};
use std::time::Duration;
use storyboard_core::{BatchOutcome, FailurePolicy, ImageData, StyleParams};
use storyboard_error::{
    ConfigError, GenerationError, GenerationErrorKind, StoryboardError, StoryboardResult,
};
use storyboard_interface::{BatchProgress, ImageGenerator, ScriptAnalyzer};
use storyboard_rate_limit::call_with_retry;
use tracing::{info, instrument, warn};

/// Options for a persona run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaOptions {
    /// Style applied to every portrait
    pub style_params: StyleParams,
    /// Face to reproduce across every portrait
    pub reference_image: Option<ImageData>,
}

/// Generates one portrait per character found in a script.
pub struct PersonaPipeline<'a, G: ?Sized, A: ?Sized> {
    generator: &'a G,
    analyzer: &'a A,
    context: &'a PipelineContext,
}

impl<'a, G, A> PersonaPipeline<'a, G, A>
where
    G: ImageGenerator + ?Sized,
    A: ScriptAnalyzer + ?Sized,
{
    /// Creates a persona pipeline.
    pub fn new(generator: &'a G, analyzer: &'a A, context: &'a PipelineContext) -> Self {
        Self {
            generator,
            analyzer,
            context,
        }
    }

    /// Analyze `script` for characters and generate a portrait of each.
    ///
    /// Failed portraits are dropped from `items` and listed in `failed`.
    ///
    /// # Errors
    ///
    /// - Configuration error for an empty script or a rejected credential
    /// - Analysis error when the script yields no characters
    /// - Total-failure error when no portrait could be generated
    #[instrument(skip(self, script, options), fields(style = %options.style_params.style()))]
    pub async fn generate(
        &self,
        script: &str,
        options: &PersonaOptions,
    ) -> StoryboardResult<BatchOutcome> {
        let script = script.trim();
        if script.is_empty() {
            return Err(ConfigError::new("Script is empty").into());
        }

        self.context.emit(BatchProgress::Analyzing);

        let reference_note = match &options.reference_image {
            Some(image) => self.describe_reference(image).await?,
            None => None,
        };

        let policy = self.context.config().analysis_retry;
        let as_animals = options.style_params.style().is_animal();
        let analyzer = self.analyzer;
        let characters = call_with_retry(&policy, || analyzer.analyze_characters(script, as_animals))
            .await
            .map_err(StoryboardError::from)?;

        let characters: Vec<_> = characters
            .into_iter()
            .filter(|c| !c.name.trim().is_empty())
            .collect();
        if characters.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::Analysis(
                "No characters found in the script".to_string(),
            ))
            .into());
        }
        info!(count = characters.len(), "Characters extracted");

        let requests: Vec<_> = characters
            .iter()
            .enumerate()
            .map(|(position, profile)| {
                persona_request(
                    position,
                    profile,
                    &options.style_params,
                    options.reference_image.as_ref(),
                    reference_note.as_deref(),
                )
            })
            .collect();

        let delay = Duration::from_millis(self.context.config().batch.persona_delay_ms);
        let outcomes = BatchGenerator::new(self.generator, self.context)
            .generate_batch(&requests, delay)
            .await?;

        let outcome = aggregate(outcomes, FailurePolicy::Drop);
        info!(status = %outcome.status_message(), "Persona generation finished");
        Ok(outcome.into_result("personas")?)
    }

    /// Describe the reference face. Failure only costs the note.
    async fn describe_reference(&self, image: &ImageData) -> StoryboardResult<Option<String>> {
        let policy = self.context.config().analysis_retry;
        let analyzer = self.analyzer;
        match call_with_retry(&policy, || analyzer.describe_reference(image)).await {
            Ok(note) if !note.trim().is_empty() => Ok(Some(note)),
            Ok(_) => Ok(None),
            Err(e) if e.inner().kind.is_credential_error() => Err(StoryboardError::from(e)),
            Err(e) => {
                warn!(error = %e, "Reference image analysis failed, continuing without it");
                Ok(None)
            }
        }
    }
}
