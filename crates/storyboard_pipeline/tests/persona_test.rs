// Persona pipeline tests against scripted mocks.
//
// All tests run on a paused clock, so the fixed inter-item and fallback
// delays advance instantly and can be measured exactly.

mod test_utils;

use std::time::Duration;
use storyboard_core::{
    CharacterProfile, FailureKind, ImageData, OutcomeSummary, Style, StyleParams,
};
use storyboard_error::{GenerationErrorKind, ImageApiErrorKind, StoryboardErrorKind};
use storyboard_pipeline::{
    CancellationFlag, PersonaOptions, PersonaPipeline, PipelineContext, regenerate_persona,
};
use test_utils::{MockImageGenerator, MockResponse, MockScriptAnalyzer, test_config};
use tokio::time::Instant;

const SCRIPT: &str = "Five friends meet every Friday at a small cafe in Busan.";

#[tokio::test(start_paused = true)]
async fn one_failing_persona_is_dropped() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_failing_on("Char3", MockResponse::Empty);
    let analyzer = MockScriptAnalyzer::with_characters(5);
    let context = PipelineContext::new(test_config());
    let started = Instant::now();

    let outcome = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &PersonaOptions::default())
        .await?;

    let names: Vec<_> = outcome.items.iter().map(|i| i.subject_name.as_str()).collect();
    assert_eq!(names, vec!["Char1", "Char2", "Char4", "Char5"]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].position, 2);
    assert_eq!(outcome.failed[0].subject_name, "Char3");
    assert_eq!(outcome.summary, OutcomeSummary::Partial);
    assert_eq!(outcome.succeeded_count() + outcome.failed.len(), outcome.requested);

    // Four primaries that worked, plus one primary and one fallback for Char3.
    assert_eq!(generator.call_count(), 6);
    // Four 2s gaps between five items, and one 1s wait before the fallback.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(9000));
    assert!(elapsed < Duration::from_millis(9100));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fallback_runs_at_most_once() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_always(MockResponse::Empty);
    let analyzer = MockScriptAnalyzer::with_characters(1);
    let context = PipelineContext::new(test_config());

    let result = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &PersonaOptions::default())
        .await;

    assert_eq!(generator.call_count(), 2);
    let err = match result {
        Err(err) => err,
        Ok(outcome) => anyhow::bail!("expected total failure, got {outcome:?}"),
    };
    match err.kind() {
        StoryboardErrorKind::Generation(e) => {
            assert!(matches!(
                e.kind,
                GenerationErrorKind::TotalFailure { requested: 1, .. }
            ));
        }
        other => anyhow::bail!("unexpected error kind: {other}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fallback_image_is_marked() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_sequence(vec![MockResponse::Empty, MockResponse::Image]);
    let analyzer = MockScriptAnalyzer::with_characters(1);
    let context = PipelineContext::new(test_config());

    let outcome = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &PersonaOptions::default())
        .await?;

    assert_eq!(outcome.items.len(), 1);
    assert!(outcome.items[0].used_fallback);
    assert!(outcome.items[0].prompt_used.contains("neutral background"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rejected_credential_aborts_batch() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_always(MockResponse::Error(
        ImageApiErrorKind::InvalidApiKey("API key not valid".to_string()),
    ));
    let analyzer = MockScriptAnalyzer::with_characters(3);
    let context = PipelineContext::new(test_config());

    let err = match PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &PersonaOptions::default())
        .await
    {
        Err(err) => err,
        Ok(outcome) => anyhow::bail!("expected abort, got {outcome:?}"),
    };

    assert!(err.is_configuration());
    assert_eq!(generator.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn empty_script_is_rejected_before_analysis() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_characters(2);
    let context = PipelineContext::new(test_config());

    let result = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate("   \n", &PersonaOptions::default())
        .await;

    assert!(result.is_err_and(|e| e.is_configuration()));
    assert_eq!(analyzer.call_count(), 0);
    assert_eq!(generator.call_count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn no_characters_is_an_analysis_error() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_characters(0);
    let context = PipelineContext::new(test_config());

    let result = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &PersonaOptions::default())
        .await;

    match result {
        Err(err) => assert!(matches!(
            err.kind(),
            StoryboardErrorKind::Generation(e) if matches!(e.kind, GenerationErrorKind::Analysis(_))
        )),
        Ok(outcome) => anyhow::bail!("expected analysis error, got {outcome:?}"),
    }
    assert_eq!(generator.call_count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reference_face_is_described_and_attached() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_characters(2);
    let context = PipelineContext::new(test_config());
    let options = PersonaOptions {
        style_params: StyleParams::default(),
        reference_image: Some(ImageData::new("image/jpeg", vec![0xff, 0xd8])),
    };

    let outcome = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &options)
        .await?;

    assert_eq!(outcome.summary, OutcomeSummary::AllSucceeded);
    for call in generator.calls() {
        assert!(call.prompt.contains("round glasses"));
        assert_eq!(call.reference_labels.len(), 1);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reference_analysis_failure_is_not_fatal() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_characters(2).failing_reference(
        ImageApiErrorKind::HttpError {
            status_code: 400,
            message: "Unsupported image".to_string(),
        },
    );
    let context = PipelineContext::new(test_config());
    let options = PersonaOptions {
        style_params: StyleParams::default(),
        reference_image: Some(ImageData::new("image/jpeg", vec![0xff, 0xd8])),
    };

    let outcome = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &options)
        .await?;

    assert_eq!(outcome.items.len(), 2);
    assert!(
        generator
            .prompts()
            .iter()
            .all(|p| !p.contains("reference face description"))
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn animal_style_uses_animal_prompts() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_characters(1);
    let context = PipelineContext::new(test_config());
    let options = PersonaOptions {
        style_params: StyleParams::builder().style(Style::Animal).build()?,
        reference_image: None,
    };

    PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &options)
        .await?;

    assert!(generator.prompts()[0].contains("animal character"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn regenerated_persona_uses_profile_without_analysis() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let context = PipelineContext::new(test_config());
    let profile = CharacterProfile::new("Minji", "A barista in her thirties with a calm smile");
    let options = PersonaOptions {
        style_params: StyleParams::builder().style(Style::Webtoon).build()?,
        reference_image: Some(ImageData::new("image/jpeg", vec![0xff, 0xd8])),
    };

    let item = regenerate_persona(&generator, &context, 1, &profile, &options).await?;

    assert_eq!(item.position, 1);
    assert_eq!(item.subject_name, "Minji");
    assert!(!item.used_fallback);
    assert_eq!(generator.call_count(), 1);

    let call = &generator.calls()[0];
    assert!(call.prompt.contains("Minji"));
    assert!(call.prompt.contains("A barista in her thirties with a calm smile"));
    assert!(call.prompt.contains("webtoon art style"));
    // The face is attached as an image but never described.
    assert_eq!(call.reference_labels.len(), 1);
    assert!(!call.prompt.contains("round glasses"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn regenerated_persona_retries_then_falls_back() -> anyhow::Result<()> {
    let rate_limited = MockResponse::Error(ImageApiErrorKind::RateLimited("quota".to_string()));
    let generator = MockImageGenerator::new_sequence(vec![
        rate_limited.clone(),
        rate_limited.clone(),
        rate_limited,
        MockResponse::Image,
    ]);
    let context = PipelineContext::new(test_config());
    let profile = CharacterProfile::new("Jisoo", "A retired detective");
    let started = Instant::now();

    let item = regenerate_persona(&generator, &context, 0, &profile, &PersonaOptions::default())
        .await?;

    // Three primary attempts, then one fallback.
    assert_eq!(generator.call_count(), 4);
    assert!(item.used_fallback);
    assert!(generator.prompts()[3].contains("headshot of one Korean person representing Jisoo"));
    // 1s and 2s backoff, then the 1s fallback wait.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(4000));
    assert!(elapsed < Duration::from_millis(4100));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn regenerated_persona_reports_failure_as_error() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_always(MockResponse::Error(
        ImageApiErrorKind::HttpError {
            status_code: 400,
            message: "Bad request".to_string(),
        },
    ));
    let context = PipelineContext::new(test_config());
    let profile = CharacterProfile::new("Jisoo", "A retired detective");

    let result =
        regenerate_persona(&generator, &context, 0, &profile, &PersonaOptions::default()).await;

    assert_eq!(generator.call_count(), 2);
    match result {
        Err(err) => match err.kind() {
            StoryboardErrorKind::Generation(e) => assert!(matches!(
                e.kind,
                GenerationErrorKind::TotalFailure { requested: 1, .. }
            )),
            other => anyhow::bail!("unexpected error kind: {other}"),
        },
        Ok(item) => anyhow::bail!("expected failure, got {item:?}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn regenerated_persona_stops_on_rejected_credential() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_always(MockResponse::Error(
        ImageApiErrorKind::InvalidApiKey("API key not valid".to_string()),
    ));
    let context = PipelineContext::new(test_config());
    let profile = CharacterProfile::new("Jisoo", "A retired detective");

    let result =
        regenerate_persona(&generator, &context, 0, &profile, &PersonaOptions::default()).await;

    assert!(result.is_err_and(|e| e.is_configuration()));
    assert_eq!(generator.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancelled_persona_batch_returns_outcome() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_characters(3);
    let cancel = CancellationFlag::default();
    cancel.cancel();
    let context = PipelineContext::new(test_config()).with_cancellation(cancel);

    let outcome = PersonaPipeline::new(&generator, &analyzer, &context)
        .generate(SCRIPT, &PersonaOptions::default())
        .await?;

    assert_eq!(generator.call_count(), 0);
    assert!(outcome.items.is_empty());
    assert_eq!(outcome.failed.len(), 3);
    assert!(outcome.was_cancelled());
    assert!(
        outcome
            .failed
            .iter()
            .all(|f| f.error_kind == FailureKind::Cancelled)
    );
    Ok(())
}
