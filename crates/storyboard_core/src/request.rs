//! Per-item generation requests.

use crate::{ImageData, StyleParams};
use serde::{Deserialize, Serialize};

/// What a request depicts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum SubjectKind {
    /// Character portrait
    #[display("persona")]
    Persona,
    /// Storyboard scene
    #[display("scene")]
    Scene,
}

/// Role of a reference image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Overall visual style for scenes
    Style,
    /// Face to reproduce in personas
    Face,
    /// A generated persona to keep consistent across scenes
    Character,
}

/// An image sent alongside the prompt, followed by a text label that tells
/// the model what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    /// What the image is for
    pub kind: ReferenceKind,
    /// Text part sent right after the image
    pub label: String,
    /// Image content
    pub image: ImageData,
}

impl ReferenceImage {
    /// Style reference shared by all scenes.
    pub fn style(image: ImageData) -> Self {
        Self {
            kind: ReferenceKind::Style,
            label: "Style reference image - please maintain consistency with this visual style"
                .to_string(),
            image,
        }
    }

    /// Face reference for persona generation.
    pub fn face(image: ImageData) -> Self {
        Self {
            kind: ReferenceKind::Face,
            label: "Reference style image - maintain visual consistency with this person's facial features, style, and appearance".to_string(),
            image,
        }
    }

    /// Generated persona image reused for scene consistency.
    pub fn character(name: &str, image: ImageData) -> Self {
        Self {
            kind: ReferenceKind::Character,
            label: format!("Reference image for character: {}", name),
            image,
        }
    }
}

/// Everything needed to generate one image.
///
/// Built per item before the batch starts and never changed afterwards.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GenerationRequest, StyleParams, SubjectKind};
///
/// let request = GenerationRequest {
///     subject_id: "char-1".to_string(),
///     subject_name: "Minji".to_string(),
///     prompt_seed: "A cheerful barista in her twenties".to_string(),
///     kind: SubjectKind::Persona,
///     style_params: StyleParams::default(),
///     references: vec![],
///     reference_note: None,
/// };
///
/// assert_eq!(request.kind, SubjectKind::Persona);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Stable identifier for the subject
    pub subject_id: String,
    /// Display name (character name, or "Scene N")
    pub subject_name: String,
    /// Character description or scene text
    pub prompt_seed: String,
    /// Persona or scene
    pub kind: SubjectKind,
    /// Style shared by the batch
    pub style_params: StyleParams,
    /// Images sent with the prompt
    #[serde(skip)]
    pub references: Vec<ReferenceImage>,
    /// Text description of a reference face, if one was analyzed
    #[serde(default)]
    pub reference_note: Option<String>,
}

impl GenerationRequest {
    /// True if any reference has the given kind.
    pub fn has_reference(&self, kind: ReferenceKind) -> bool {
        self.references.iter().any(|r| r.kind == kind)
    }
}
