//! One-shot simplified retry after the primary prompt fails.

use crate::replace_unsafe_words;
use std::time::Duration;
use storyboard_core::{
    AspectRatio, FailureKind, GenerationRequest, ImageData, ItemFailure, ReferenceImage,
    ReferenceKind, SubjectKind, WordReplacement,
};
use storyboard_interface::ImageGenerator;
use storyboard_rate_limit::{CallError, FallbackConfig, RequestThrottle, call_with_retry};
use tracing::{debug, info, instrument, warn};

/// Image produced by the fallback prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackImage {
    /// Image bytes
    pub image: ImageData,
    /// Prompt that produced it
    pub prompt: String,
    /// Words swapped out of the subject text
    pub replacements: Vec<WordReplacement>,
}

fn ratio_instruction(aspect_ratio: AspectRatio) -> String {
    let (width, height) = aspect_ratio.dimensions();
    format!(
        "MUST BE {} {} ratio ({}x{}).",
        aspect_ratio,
        aspect_ratio.orientation(),
        width,
        height
    )
}

/// Simplified prompt for `request`.
///
/// Style fragments and any custom override are dropped. The subject text goes
/// through [`replace_unsafe_words`] first.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GenerationRequest, StyleParams, SubjectKind};
/// use storyboard_pipeline::fallback_prompt;
///
/// let request = GenerationRequest {
///     subject_id: "scene-1".to_string(),
///     subject_name: "Scene 1".to_string(),
///     prompt_seed: "범인이 골목으로 도망친다".to_string(),
///     kind: SubjectKind::Scene,
///     style_params: StyleParams::default(),
///     references: vec![],
///     reference_note: None,
/// };
///
/// let (prompt, replacements) = fallback_prompt(&request);
/// assert!(prompt.contains("neutral background"));
/// assert!(!prompt.contains("범인"));
/// assert_eq!(replacements.len(), 1);
/// ```
pub fn fallback_prompt(request: &GenerationRequest) -> (String, Vec<WordReplacement>) {
    let params = &request.style_params;
    let ratio = ratio_instruction(*params.aspect_ratio());
    let style = params.style();

    let subject = match request.kind {
        SubjectKind::Persona => request.subject_name.trim(),
        SubjectKind::Scene => request.prompt_seed.trim(),
    };
    let (subject, replacements) = replace_unsafe_words(subject);

    let prompt = match request.kind {
        SubjectKind::Persona if style.is_animal() => format!(
            "{} One cute animal character representing {}. Simple, lovable animal design, clean neutral background, kawaii style. One subject only, no subtitles, no speech bubbles, no text.",
            ratio, subject
        ),
        SubjectKind::Persona if style.is_illustrated() => format!(
            "{} A simple animated character of one Korean person representing {}. Clean animation style, neutral background. One subject only, no subtitles, no speech bubbles, no text.",
            ratio, subject
        ),
        SubjectKind::Persona => format!(
            "{} A professional headshot of one Korean person representing {}. Clean neutral background, neutral expression, realistic style. One subject only, no subtitles, no speech bubbles, no text.",
            ratio, subject
        ),
        SubjectKind::Scene if style.is_animal() => format!(
            "{} A simple, peaceful picture of cute animal characters in this scene: \"{}\". One main subject, neutral background, no subtitles, no speech bubbles, no text.",
            ratio, subject
        ),
        SubjectKind::Scene => format!(
            "{} A simple, peaceful picture of this scene: \"{}\". One main subject, neutral background, no subtitles, no speech bubbles, no text.",
            ratio, subject
        ),
    };
    (prompt, replacements)
}

/// Try `request` once more with the simplified prompt.
///
/// Waits `config.delay_ms` first. Only a face reference is carried over;
/// style and character references are dropped with the style text.
#[instrument(
    skip(generator, request, config, throttle),
    fields(subject = %request.subject_name)
)]
pub async fn fallback<G>(
    generator: &G,
    position: usize,
    request: &GenerationRequest,
    config: &FallbackConfig,
    throttle: Option<&RequestThrottle>,
) -> Result<FallbackImage, ItemFailure>
where
    G: ImageGenerator + ?Sized,
{
    let (prompt, replacements) = fallback_prompt(request);
    for replacement in &replacements {
        info!(
            original = %replacement.original,
            replacement = %replacement.replacement,
            "Replaced word in fallback prompt"
        );
    }

    tokio::time::sleep(Duration::from_millis(config.delay_ms)).await;

    let references: Vec<ReferenceImage> = request
        .references
        .iter()
        .filter(|r| r.kind == ReferenceKind::Face)
        .cloned()
        .collect();
    let aspect_ratio = *request.style_params.aspect_ratio();

    let failure = |error_kind: FailureKind, message: String| ItemFailure {
        position,
        subject_id: request.subject_id.clone(),
        subject_name: request.subject_name.clone(),
        error_kind,
        message,
    };

    let result = call_with_retry(&config.retry, || {
        let prompt = prompt.as_str();
        let references = references.as_slice();
        async move {
            if let Some(throttle) = throttle {
                throttle.acquire().await;
            }
            generator
                .generate_image(prompt, aspect_ratio, references)
                .await
        }
    })
    .await;

    match result {
        Ok(Some(image)) if !image.is_empty() => {
            debug!("Fallback produced an image");
            Ok(FallbackImage {
                image,
                prompt,
                replacements,
            })
        }
        Ok(_) => {
            warn!("Fallback returned no image data");
            Err(failure(
                FailureKind::EmptyPayload,
                "No image data returned from both primary and fallback attempts".to_string(),
            ))
        }
        Err(e @ CallError::MaxRetriesExceeded { .. }) => {
            warn!(error = %e, "Fallback exhausted retries");
            Err(failure(FailureKind::MaxRetriesExceeded, e.to_string()))
        }
        Err(CallError::Fatal(e)) => {
            warn!(error = %e, "Fallback failed");
            Err(failure(FailureKind::from(&e.kind), e.to_string()))
        }
    }
}
