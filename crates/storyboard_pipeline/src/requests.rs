//! Building per-item requests from analysis results.

use storyboard_core::{
    CharacterProfile, GenerationRequest, ImageData, ReferenceImage, StyleParams, SubjectKind,
};

/// Request for the persona at `position`.
///
/// A face reference, if given, is attached as an image and `reference_note`
/// carries its text description.
pub fn persona_request(
    position: usize,
    profile: &CharacterProfile,
    style_params: &StyleParams,
    face_reference: Option<&ImageData>,
    reference_note: Option<&str>,
) -> GenerationRequest {
    GenerationRequest {
        subject_id: format!("persona-{}", position + 1),
        subject_name: profile.name.trim().to_string(),
        prompt_seed: profile.description.trim().to_string(),
        kind: SubjectKind::Persona,
        style_params: style_params.clone(),
        references: face_reference
            .cloned()
            .map(ReferenceImage::face)
            .into_iter()
            .collect(),
        reference_note: reference_note
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_string),
    }
}

/// Request for the scene at `position`, named "Scene N".
///
/// # Examples
///
/// ```
/// use storyboard_core::{StyleParams, SubjectKind};
/// use storyboard_pipeline::scene_request;
///
/// let request = scene_request(0, "Two friends share an umbrella", &StyleParams::default(), vec![]);
/// assert_eq!(request.subject_name, "Scene 1");
/// assert_eq!(request.kind, SubjectKind::Scene);
/// ```
pub fn scene_request(
    position: usize,
    scene: &str,
    style_params: &StyleParams,
    references: Vec<ReferenceImage>,
) -> GenerationRequest {
    GenerationRequest {
        subject_id: format!("scene-{}", position + 1),
        subject_name: format!("Scene {}", position + 1),
        prompt_seed: scene.trim().to_string(),
        kind: SubjectKind::Scene,
        style_params: style_params.clone(),
        references,
        reference_note: None,
    }
}
