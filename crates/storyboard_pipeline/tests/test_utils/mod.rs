//! Test utilities for pipeline tests.
//!
//! Scripted stand-ins for the image generator and the script analyzer.

pub mod mock_analyzer;
pub mod mock_image;

#[allow(unused_imports)]
pub use mock_analyzer::MockScriptAnalyzer;
#[allow(unused_imports)]
pub use mock_image::{MockBehavior, MockImageGenerator, MockResponse};

use storyboard_rate_limit::StoryboardConfig;

/// Default configuration with throttling off.
#[allow(dead_code)]
pub fn test_config() -> StoryboardConfig {
    StoryboardConfig::default()
}
