// Storyboard pipeline tests against scripted mocks.

mod test_utils;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyboard_core::{
    FailureKind, GeneratedItem, GenerationRequest, ImageData, OutcomeSummary, StyleParams,
    SubjectKind,
};
use storyboard_error::ImageApiErrorKind;
use storyboard_interface::BatchProgress;
use storyboard_pipeline::{
    CancellationFlag, PipelineContext, SceneOptions, StoryboardPipeline, regenerate_scene,
};
use test_utils::{MockImageGenerator, MockResponse, MockScriptAnalyzer, test_config};
use tokio::time::Instant;

const NUMBERED_SCRIPT: &str = "\
1. Minji opens the cafe at dawn
2. Jisoo orders an americano
3. The storm hits the harbor
4. They share an umbrella outside
5. The sun comes back over the sea";

fn persona(name: &str) -> GeneratedItem {
    let request = GenerationRequest {
        subject_id: format!("persona-{}", name),
        subject_name: name.to_string(),
        prompt_seed: format!("{} description", name),
        kind: SubjectKind::Persona,
        style_params: StyleParams::default(),
        references: vec![],
        reference_note: None,
    };
    GeneratedItem::success(0, &request, "prompt", ImageData::new("image/png", vec![1, 2, 3]))
}

#[tokio::test(start_paused = true)]
async fn failed_scene_keeps_its_slot() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_failing_on(
        "storm",
        MockResponse::Error(ImageApiErrorKind::HttpError {
            status_code: 500,
            message: "Internal error".to_string(),
        }),
    );
    let analyzer = MockScriptAnalyzer::with_scenes(vec![]);
    let context = PipelineContext::new(test_config());
    let started = Instant::now();

    let outcome = StoryboardPipeline::new(&generator, &analyzer, &context)
        .generate(NUMBERED_SCRIPT, &[], 5, &SceneOptions::default())
        .await?;

    assert_eq!(outcome.items.len(), 5);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.summary, OutcomeSummary::Partial);
    assert_eq!(outcome.succeeded_count() + outcome.failed.len(), outcome.requested);

    let failed = &outcome.items[2];
    assert!(!failed.has_image());
    assert_eq!(failed.description_or_scene, "The storm hits the harbor");
    assert_eq!(failed.subject_name, "Scene 3");
    assert_eq!(outcome.failed[0].error_kind, FailureKind::Request);
    assert!(outcome.items.iter().enumerate().all(|(i, item)| item.position == i));

    // Numbered scripts skip the analyzer.
    assert_eq!(analyzer.call_count(), 0);
    assert_eq!(generator.call_count(), 6);

    // Four 3s gaps and one 1s fallback wait.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(13_000));
    assert!(elapsed < Duration::from_millis(13_100));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn too_many_scenes_is_rejected_before_any_call() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_scenes(vec!["a scene".to_string(); 25]);
    let context = PipelineContext::new(test_config());
    let pipeline = StoryboardPipeline::new(&generator, &analyzer, &context);

    for count in [0, 21, 25] {
        let result = pipeline
            .generate("A long story.", &[], count, &SceneOptions::default())
            .await;
        assert!(result.is_err_and(|e| e.is_configuration()), "count {count}");
    }

    assert_eq!(generator.call_count(), 0);
    assert_eq!(analyzer.call_count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn configured_scene_limit_is_honored() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_scenes(vec!["a scene".to_string(); 10]);
    let mut config = test_config();
    config.batch.max_scenes = 5;
    let context = PipelineContext::new(config);
    let pipeline = StoryboardPipeline::new(&generator, &analyzer, &context);

    assert_eq!(pipeline.scene_limit(), 5);
    let result = pipeline
        .generate("A story.", &[], 6, &SceneOptions::default())
        .await;
    assert!(result.is_err_and(|e| e.is_configuration()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn total_scene_failure_returns_placeholders() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_always(MockResponse::Empty);
    let analyzer = MockScriptAnalyzer::with_scenes(vec![
        "A quiet street".to_string(),
        "A crowded market".to_string(),
    ]);
    let context = PipelineContext::new(test_config());

    let outcome = StoryboardPipeline::new(&generator, &analyzer, &context)
        .generate("Two places in one day.", &[], 2, &SceneOptions::default())
        .await?;

    assert_eq!(outcome.summary, OutcomeSummary::TotalFailure);
    assert_eq!(outcome.items.len(), 2);
    assert!(outcome.items.iter().all(|item| !item.has_image()));
    assert_eq!(outcome.items[1].description_or_scene, "A crowded market");
    assert_eq!(analyzer.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn personas_and_style_are_sent_as_references() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_scenes(vec![]);
    let context = PipelineContext::new(test_config());
    let options = SceneOptions {
        style_params: StyleParams::default(),
        style_reference: Some(ImageData::new("image/png", vec![9])),
    };
    let characters = vec![persona("Minji"), persona("Jisoo")];

    StoryboardPipeline::new(&generator, &analyzer, &context)
        .generate(NUMBERED_SCRIPT, &characters, 2, &options)
        .await?;

    let calls = generator.calls();
    assert_eq!(calls.len(), 2);
    for call in calls {
        assert_eq!(
            call.reference_labels,
            vec![
                "Style reference image - please maintain consistency with this visual style"
                    .to_string(),
                "Reference image for character: Minji".to_string(),
                "Reference image for character: Jisoo".to_string(),
            ]
        );
        assert!(call.prompt.contains("match the reference images"));
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn transient_errors_are_retried_with_backoff() -> anyhow::Result<()> {
    let overloaded = MockResponse::Error(ImageApiErrorKind::Unavailable {
        status_code: 503,
        message: "The model is overloaded".to_string(),
    });
    let generator =
        MockImageGenerator::new_sequence(vec![overloaded.clone(), overloaded, MockResponse::Image]);
    let analyzer = MockScriptAnalyzer::with_scenes(vec!["A lighthouse at night".to_string()]);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let context = PipelineContext::new(test_config())
        .with_observer(Arc::new(move |event: &BatchProgress| {
            sink.lock().unwrap().push(event.clone());
        }));
    let started = Instant::now();

    let outcome = StoryboardPipeline::new(&generator, &analyzer, &context)
        .generate("A lighthouse.", &[], 1, &SceneOptions::default())
        .await?;

    assert_eq!(outcome.summary, OutcomeSummary::AllSucceeded);
    assert!(!outcome.items[0].used_fallback);
    assert_eq!(generator.call_count(), 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed < Duration::from_millis(3100));

    let retries: Vec<_> = events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            BatchProgress::Retrying { attempt, delay_ms } => Some((*attempt, *delay_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(retries, vec![(1, 1000), (2, 2000)]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_fall_back_once() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_always(MockResponse::Error(
        ImageApiErrorKind::RateLimited("Quota exceeded".to_string()),
    ));
    let analyzer = MockScriptAnalyzer::with_scenes(vec!["A rainy bus stop".to_string()]);
    let context = PipelineContext::new(test_config());

    let outcome = StoryboardPipeline::new(&generator, &analyzer, &context)
        .generate("A bus stop.", &[], 1, &SceneOptions::default())
        .await?;

    // Three primary attempts, one fallback.
    assert_eq!(generator.call_count(), 4);
    assert_eq!(outcome.failed[0].error_kind, FailureKind::MaxRetriesExceeded);
    assert!(outcome.failed[0].message.contains("fallback"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_between_items() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_success();
    let analyzer = MockScriptAnalyzer::with_scenes(vec![]);
    let cancel = CancellationFlag::default();
    let trigger = cancel.clone();
    let context = PipelineContext::new(test_config())
        .with_cancellation(cancel)
        .with_observer(Arc::new(move |event: &BatchProgress| {
            if matches!(event, BatchProgress::ItemFinished { .. }) {
                trigger.cancel();
            }
        }));

    let outcome = StoryboardPipeline::new(&generator, &analyzer, &context)
        .generate(NUMBERED_SCRIPT, &[], 3, &SceneOptions::default())
        .await?;

    assert_eq!(generator.call_count(), 1);
    assert_eq!(outcome.items.len(), 3);
    assert!(outcome.items[0].has_image());
    assert_eq!(outcome.failed.len(), 2);
    assert!(
        outcome
            .failed
            .iter()
            .all(|f| f.error_kind == FailureKind::Cancelled)
    );
    assert_eq!(outcome.succeeded_count() + outcome.failed.len(), outcome.requested);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn regenerated_scene_replaces_unsafe_words_in_fallback() -> anyhow::Result<()> {
    let generator = MockImageGenerator::new_sequence(vec![MockResponse::Empty, MockResponse::Image]);
    let context = PipelineContext::new(test_config());

    let item = regenerate_scene(
        &generator,
        &context,
        3,
        "범인이 골목으로 도망친다",
        &[],
        &SceneOptions::default(),
    )
    .await?;

    assert!(item.used_fallback);
    assert_eq!(item.position, 3);
    assert_eq!(item.subject_name, "Scene 4");
    assert_eq!(item.replacements.len(), 1);
    assert_eq!(item.replacements[0].original, "범인");
    assert!(!generator.prompts()[1].contains("범인"));
    assert_eq!(item.description_or_scene, "범인이 골목으로 도망친다");
    Ok(())
}
