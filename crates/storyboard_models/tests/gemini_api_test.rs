//! Live API tests. Run with `--features api` and GEMINI_API_KEY set.

#![cfg(feature = "api")]

use storyboard_interface::ScriptAnalyzer;
use storyboard_models::GeminiClient;
use storyboard_rate_limit::GeminiConfig;

#[tokio::test]
async fn analyzes_scenes_from_a_short_script() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let client = GeminiClient::from_env(GeminiConfig::default())?;

    let scenes = client
        .analyze_scenes(
            "A girl finds a lost puppy in the rain. She takes it home. They become best friends.",
            3,
        )
        .await?;

    assert!(!scenes.is_empty());
    Ok(())
}
