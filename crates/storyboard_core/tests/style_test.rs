use storyboard_core::{AspectRatio, Composition, Style, StyleParams};

#[test]
fn style_parses_english_and_korean_labels() {
    assert_eq!("cyberpunk".parse::<Style>().unwrap(), Style::Cyberpunk);
    assert_eq!("CYBERPUNK".parse::<Style>().unwrap(), Style::Cyberpunk);
    assert_eq!("사이버펑크".parse::<Style>().unwrap(), Style::Cyberpunk);
    assert_eq!("조선시대".parse::<Style>().unwrap(), Style::Joseon);
    assert_eq!("AI".parse::<Style>().unwrap(), Style::Ai);
}

#[test]
fn unknown_style_passes_through() {
    let style: Style = "oil painting, thick brush strokes".parse().unwrap();
    assert_eq!(style.fragment(), "oil painting, thick brush strokes");
    assert_eq!(style.to_string(), "oil painting, thick brush strokes");
}

#[test]
fn composition_rejects_unknown_names() {
    let err = "bird's eye".parse::<Composition>().unwrap_err();
    assert!(err.message.contains("bird's eye"));
    assert!(err.message.contains("close-up"));
}

#[test]
fn composition_parses_both_labels() {
    assert_eq!("반측면".parse::<Composition>().unwrap(), Composition::ThreeQuarter);
    assert_eq!("Full-Body".parse::<Composition>().unwrap(), Composition::FullBody);
    assert_eq!(
        Composition::LowAngle.fragment(),
        "Low angle shot, view from below"
    );
}

#[test]
fn aspect_ratio_dimensions() {
    assert_eq!(AspectRatio::Landscape.dimensions(), (1920, 1080));
    assert_eq!(AspectRatio::Portrait.dimensions(), (1080, 1920));
    assert_eq!(AspectRatio::Square.dimensions(), (1024, 1024));
    assert!("4:3".parse::<AspectRatio>().is_err());
}

#[test]
fn blank_override_is_ignored() {
    let params = StyleParams::builder()
        .custom_prompt_override(Some("   ".to_string()))
        .build()
        .unwrap();
    assert!(params.active_override().is_none());

    let params = StyleParams::builder()
        .custom_prompt_override(Some("a red kite".to_string()))
        .build()
        .unwrap();
    assert_eq!(params.active_override(), Some("a red kite"));
}

#[test]
fn style_params_deserialize_with_defaults() {
    let params: StyleParams = serde_json::from_str(r#"{"aspect_ratio": "1:1"}"#).unwrap();
    assert_eq!(params.aspect_ratio(), &AspectRatio::Square);
    assert_eq!(params.style(), &Style::Modern);
    assert!(*params.subtitles());
}
