//! Handlers for the generation commands.

use super::StyleArgs;
use std::path::Path;
use std::sync::Arc;
use storyboard::{
    AspectRatio, BatchOutcome, BatchProgress, Composition, ConfigError, GeminiClient, ImageData,
    OutputDirectory, PersonaOptions, PersonaPipeline, PipelineContext, SceneOptions, StorageError,
    StorageErrorKind, StoryboardConfig, StoryboardPipeline, StoryboardResult, Style, StyleParams,
    validate_scene_count,
};
use tracing::{info, instrument, warn};

/// Load the configuration from `path`, or from the default locations.
pub fn load_config(path: Option<&Path>) -> StoryboardResult<StoryboardConfig> {
    match path {
        Some(path) => {
            let config = StoryboardConfig::from_file(path)?;
            config.validate()?;
            Ok(config)
        }
        None => StoryboardConfig::load(),
    }
}

/// Build style parameters from command-line flags.
fn style_params(
    args: &StyleArgs,
    composition: Option<&str>,
    subtitles: bool,
) -> StoryboardResult<StyleParams> {
    let style: Style = args
        .style
        .parse()
        .map_err(|e| ConfigError::new(format!("Invalid style '{}': {}", args.style, e)))?;
    let aspect_ratio: AspectRatio = args.aspect_ratio.parse().map_err(|_| {
        ConfigError::new(format!(
            "Invalid aspect ratio '{}'. Expected 16:9, 9:16 or 1:1",
            args.aspect_ratio
        ))
    })?;
    let composition: Composition = match composition {
        Some(name) => name.parse()?,
        None => Composition::default(),
    };

    Ok(StyleParams::builder()
        .style(style)
        .composition(composition)
        .aspect_ratio(aspect_ratio)
        .custom_prompt_override(args.prompt.clone())
        .subtitles(subtitles)
        .build()
        .map_err(|e| ConfigError::new(format!("Invalid style parameters: {}", e)))?)
}

fn read_script(path: &Path) -> StoryboardResult<String> {
    Ok(std::fs::read_to_string(path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?)
}

fn read_image(path: &Path) -> StoryboardResult<ImageData> {
    let bytes = std::fs::read(path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    Ok(ImageData::new(ImageData::mime_for_extension(extension), bytes))
}

fn context(config: StoryboardConfig) -> PipelineContext {
    PipelineContext::new(config).with_observer(Arc::new(|event: &BatchProgress| {
        info!(target: "storyboard::progress", "{}", event);
    }))
}

fn report(outcome: &BatchOutcome) {
    info!("{}", outcome.status_message());
    for failure in &outcome.failed {
        warn!("{}", failure);
    }
}

/// `storyboard personas`
#[instrument(skip_all, fields(script = %script.display(), out = %out.display()))]
pub async fn run_personas(
    config: StoryboardConfig,
    script: &Path,
    out: &Path,
    reference: Option<&Path>,
    composition: &str,
    style: &StyleArgs,
) -> StoryboardResult<()> {
    let options = PersonaOptions {
        style_params: style_params(style, Some(composition), false)?,
        reference_image: reference.map(read_image).transpose()?,
    };
    let script = read_script(script)?;
    let output = OutputDirectory::create(out)?;

    let client = GeminiClient::from_env(config.gemini.clone())?;
    let context = context(config);

    let outcome = PersonaPipeline::new(&client, &client, &context)
        .generate(&script, &options)
        .await?;

    let manifest = output.write_outcome(&outcome, "personas")?;
    report(&outcome);
    info!(manifest = %manifest.display(), "Personas written");
    Ok(())
}

/// `storyboard scenes`
#[allow(clippy::too_many_arguments)]
#[instrument(skip_all, fields(script = %script.display(), out = %out.display(), count = count))]
pub async fn run_scenes(
    config: StoryboardConfig,
    script: &Path,
    count: usize,
    out: &Path,
    personas: Option<&Path>,
    style_reference: Option<&Path>,
    subtitles: bool,
    style: &StyleArgs,
) -> StoryboardResult<()> {
    validate_scene_count(&config, count)?;
    let options = SceneOptions {
        style_params: style_params(style, None, subtitles)?,
        style_reference: style_reference.map(read_image).transpose()?,
    };
    let characters = match personas {
        Some(dir) => OutputDirectory::open(dir).load_items()?,
        None => Vec::new(),
    };
    let script = read_script(script)?;
    let output = OutputDirectory::create(out)?;

    let client = GeminiClient::from_env(config.gemini.clone())?;
    let context = context(config);

    let outcome = StoryboardPipeline::new(&client, &client, &context)
        .generate(&script, &characters, count, &options)
        .await?;

    let manifest = output.write_outcome(&outcome, "scenes")?;
    report(&outcome);
    info!(manifest = %manifest.display(), "Scenes written");
    Ok(())
}
