//! Prompt composition.
//!
//! Everything here is a pure function of the request: the same request always
//! produces byte-identical text.

use storyboard_core::{AspectRatio, GenerationRequest, ReferenceKind, Style, SubjectKind};

/// Instruction pinning the output to an aspect ratio.
///
/// # Examples
///
/// ```
/// use storyboard_core::AspectRatio;
/// use storyboard_pipeline::aspect_ratio_instruction;
///
/// assert!(aspect_ratio_instruction(AspectRatio::Portrait).contains("1080x1920"));
/// ```
pub fn aspect_ratio_instruction(aspect_ratio: AspectRatio) -> String {
    let (width, height) = aspect_ratio.dimensions();
    match aspect_ratio {
        AspectRatio::Landscape => format!(
            "CRITICAL: Generate image in 16:9 LANDSCAPE aspect ratio. Width MUST be 1.778 times the height. This is a HORIZONTAL/WIDE format image ({}x{} pixels). NOT square, NOT portrait.",
            width, height
        ),
        AspectRatio::Portrait => format!(
            "CRITICAL: Generate image in 9:16 PORTRAIT aspect ratio. Height MUST be 1.778 times the width. This is a VERTICAL/TALL format image ({}x{} pixels). NOT square, NOT landscape.",
            width, height
        ),
        AspectRatio::Square => format!(
            "CRITICAL: Generate image in 1:1 SQUARE aspect ratio. Width and height MUST be exactly equal ({}x{} pixels). NOT landscape, NOT portrait.",
            width, height
        ),
    }
}

/// Build the primary prompt for one request.
///
/// A non-blank custom override replaces the composed body verbatim; the
/// aspect-ratio instruction is still prepended.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GenerationRequest, Style, StyleParams, SubjectKind};
/// use storyboard_pipeline::compose_prompt;
///
/// let request = GenerationRequest {
///     subject_id: "persona-1".to_string(),
///     subject_name: "Minji".to_string(),
///     prompt_seed: "A cheerful barista in her twenties".to_string(),
///     kind: SubjectKind::Persona,
///     style_params: StyleParams::builder().style(Style::Cyberpunk).build().unwrap(),
///     references: vec![],
///     reference_note: None,
/// };
///
/// let prompt = compose_prompt(&request);
/// assert!(prompt.contains("Minji"));
/// assert!(prompt.contains("neon"));
/// assert_eq!(prompt, compose_prompt(&request));
/// ```
pub fn compose_prompt(request: &GenerationRequest) -> String {
    let params = &request.style_params;
    let header = aspect_ratio_instruction(*params.aspect_ratio());

    if let Some(custom) = params.active_override() {
        let note = reference_note(request);
        return format!("{}\n\n{}{}", header, note, custom.trim());
    }

    let body = match request.kind {
        SubjectKind::Persona => persona_body(request),
        SubjectKind::Scene => scene_body(request),
    };
    format!("{}\n\n{}", header, body)
}

fn reference_note(request: &GenerationRequest) -> String {
    match request.reference_note.as_deref().map(str::trim) {
        Some(note) if !note.is_empty() => format!(
            "IMPORTANT: Use this reference face description to generate the character image. The character MUST have these specific facial features and appearance: {}\n\n",
            note
        ),
        _ => String::new(),
    }
}

fn persona_body(request: &GenerationRequest) -> String {
    let params = &request.style_params;
    let style = params.style();
    let composition = params.composition().fragment();
    let name = request.subject_name.trim();
    let description = request.prompt_seed.trim();
    let note = reference_note(request);

    let (portrait, quality, single) = match style {
        Style::Animal => (
            format!("A cute, lovable animal character portrait representing {}", name),
            "Kawaii animal character design, big expressive eyes, soft fur texture, charming personality in the expression, warm child-friendly style, professional digital art with vivid colors",
            "Only one animal character in the image",
        ),
        Style::Animation | Style::Webtoon | Style::Cute => (
            format!("A {} style character portrait of {}", style, name),
            "Clean professional illustration, detailed expressive face, design that fits the character's role and personality in the script",
            "Only one person in the image",
        ),
        Style::Eighties | Style::TwoThousands => (
            format!("A professional portrait of {} in {} fashion", name, style),
            "Period-accurate clothing, hairstyle, and accessories, high quality portrait, natural lighting, realistic style, detailed facial features",
            "Only one person in the image",
        ),
        _ => (
            format!("A professional portrait photograph of {}", name),
            "High quality Korean headshot, natural lighting, detailed realistic facial features, suited to the character's role and personality in the script, professional photography",
            "Only one person in the image",
        ),
    };

    format!(
        "{}{}. {}. {}. {}. {}. {}, no subtitles, no speech bubbles, no text, no dialogue.",
        note,
        composition,
        portrait,
        description,
        style.fragment(),
        quality,
        single
    )
}

fn scene_body(request: &GenerationRequest) -> String {
    let params = &request.style_params;
    let style = params.style();
    let scene = request.prompt_seed.trim();
    let has_characters = request.has_reference(ReferenceKind::Character);
    let has_style = request.has_reference(ReferenceKind::Style);

    let opening = match (has_characters, has_style) {
        (true, true) => "Using the provided character reference images and the style reference image, create",
        (true, false) => "Using the provided character reference images, create",
        (false, true) => "Keeping the visual consistency of the provided style reference image, create",
        (false, false) => "Create",
    };
    let medium = if style.is_illustrated() {
        "an animated, illustration-style image"
    } else {
        "a realistic, cinematic image"
    };
    let subtitles = if *params.subtitles() {
        "with Korean subtitles"
    } else {
        "without subtitles"
    };
    let consistency = if has_characters {
        " Make sure the faces and appearance of the characters in the scene match the reference images."
    } else {
        ""
    };
    let text_rule = if *params.subtitles() {
        " Place the Korean subtitle naturally along the bottom of the frame."
    } else {
        " No subtitles, captions, speech bubbles, or other text."
    };

    format!(
        "{} {} {} for this scene: \"{}\".{} {}. Frame it in {} {} so the main people and objects are not cut off.{}",
        opening,
        medium,
        subtitles,
        scene,
        consistency,
        style.fragment(),
        params.aspect_ratio(),
        params.aspect_ratio().orientation(),
        text_rule
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_core::{Composition, ImageData, ReferenceImage, StyleParams};

    fn request(kind: SubjectKind, params: StyleParams) -> GenerationRequest {
        GenerationRequest {
            subject_id: "id".to_string(),
            subject_name: "Jisoo".to_string(),
            prompt_seed: "A retired detective with grey hair".to_string(),
            kind,
            style_params: params,
            references: vec![],
            reference_note: None,
        }
    }

    #[test]
    fn persona_prompt_has_all_fragments() {
        let params = StyleParams::builder()
            .style(Style::Western)
            .composition(Composition::FullBody)
            .build()
            .unwrap();
        let prompt = compose_prompt(&request(SubjectKind::Persona, params));

        assert!(prompt.starts_with("CRITICAL: Generate image in 16:9"));
        assert!(prompt.contains("Full body shot, entire person visible"));
        assert!(prompt.contains("Jisoo"));
        assert!(prompt.contains("A retired detective with grey hair"));
        assert!(prompt.contains("classic cowboy aesthetic"));
        assert!(prompt.contains("no text"));
    }

    #[test]
    fn override_replaces_body() {
        let params = StyleParams::builder()
            .custom_prompt_override(Some("A red kite over the sea".to_string()))
            .aspect_ratio(AspectRatio::Square)
            .build()
            .unwrap();
        let prompt = compose_prompt(&request(SubjectKind::Persona, params));

        assert!(prompt.contains("1:1 SQUARE"));
        assert!(prompt.ends_with("A red kite over the sea"));
        assert!(!prompt.contains("Jisoo"));
    }

    #[test]
    fn reference_note_is_included() {
        let mut req = request(SubjectKind::Persona, StyleParams::default());
        req.reference_note = Some("Round face, short black hair".to_string());
        let prompt = compose_prompt(&req);
        assert!(prompt.contains("Round face, short black hair"));
    }

    #[test]
    fn scene_prompt_mentions_references_and_subtitles() {
        let mut req = request(SubjectKind::Scene, StyleParams::default());
        req.references = vec![
            ReferenceImage::style(ImageData::new("image/png", vec![1])),
            ReferenceImage::character("Jisoo", ImageData::new("image/png", vec![2])),
        ];
        let prompt = compose_prompt(&req);

        assert!(prompt.contains("character reference images and the style reference image"));
        assert!(prompt.contains("with Korean subtitles"));
        assert!(prompt.contains("match the reference images"));
    }

    #[test]
    fn scene_without_subtitles_forbids_text() {
        let params = StyleParams::builder().subtitles(false).build().unwrap();
        let prompt = compose_prompt(&request(SubjectKind::Scene, params));
        assert!(prompt.contains("without subtitles"));
        assert!(prompt.contains("No subtitles, captions"));
        assert!(prompt.contains("Create a realistic"));
    }

    #[test]
    fn custom_style_text_passes_through() {
        let params = StyleParams::builder()
            .style(Style::Custom("charcoal sketch on newsprint".to_string()))
            .build()
            .unwrap();
        let prompt = compose_prompt(&request(SubjectKind::Scene, params));
        assert!(prompt.contains("charcoal sketch on newsprint"));
    }
}
