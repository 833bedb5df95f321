//! Regenerating a single persona or scene.

use crate::storyboard::scene_references;
use crate::{
    BatchGenerator, ItemOutcome, PersonaOptions, PipelineContext, SceneOptions, persona_request,
    scene_request,
};
use storyboard_core::{CharacterProfile, GeneratedItem, GenerationRequest};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::ImageGenerator;
use tracing::instrument;

/// Generate a fresh portrait for one character.
///
/// Runs the same primary prompt and fallback as a batch, without the
/// inter-item delay. The reference face, if any, is attached as an image but
/// not re-analyzed.
///
/// # Errors
///
/// Returns an error when both attempts fail or the credential is rejected.
#[instrument(skip(generator, context, profile, options), fields(subject = %profile.name))]
pub async fn regenerate_persona<G>(
    generator: &G,
    context: &PipelineContext,
    position: usize,
    profile: &CharacterProfile,
    options: &PersonaOptions,
) -> StoryboardResult<GeneratedItem>
where
    G: ImageGenerator + ?Sized,
{
    let request = persona_request(
        position,
        profile,
        &options.style_params,
        options.reference_image.as_ref(),
        None,
    );
    regenerate(generator, context, position, &request, "personas").await
}

/// Generate a fresh image for one scene, keeping the persona references.
///
/// # Errors
///
/// Returns an error when both attempts fail or the credential is rejected.
#[instrument(skip(generator, context, scene, characters, options))]
pub async fn regenerate_scene<G>(
    generator: &G,
    context: &PipelineContext,
    position: usize,
    scene: &str,
    characters: &[GeneratedItem],
    options: &SceneOptions,
) -> StoryboardResult<GeneratedItem>
where
    G: ImageGenerator + ?Sized,
{
    let references = scene_references(options.style_reference.as_ref(), characters);
    let request = scene_request(position, scene, &options.style_params, references);
    regenerate(generator, context, position, &request, "scenes").await
}

async fn regenerate<G>(
    generator: &G,
    context: &PipelineContext,
    position: usize,
    request: &GenerationRequest,
    label: &str,
) -> StoryboardResult<GeneratedItem>
where
    G: ImageGenerator + ?Sized,
{
    match BatchGenerator::new(generator, context)
        .generate_item(position, request)
        .await?
    {
        ItemOutcome::Succeeded(item) => Ok(item),
        ItemOutcome::Failed { failure, .. } => {
            Err(GenerationError::new(GenerationErrorKind::TotalFailure {
                label: label.to_string(),
                requested: 1,
                summary: failure.to_string(),
            })
            .into())
        }
    }
}
