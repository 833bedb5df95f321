//! Mock image generator.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use storyboard_core::{AspectRatio, ImageData, ReferenceImage};
use storyboard_error::{ImageApiError, ImageApiErrorKind};
use storyboard_interface::ImageGenerator;

/// A single scripted response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A small PNG-tagged payload
    Image,
    /// Success without image data
    Empty,
    /// The given error
    Error(ImageApiErrorKind),
}

/// How the mock answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Every call gets the same response
    Always(MockResponse),
    /// Responses in order; calls past the end get an image
    Sequence(Vec<MockResponse>),
    /// Prompts containing `marker` get `response`; all others get an image
    FailMatching {
        /// Text to look for in the prompt
        marker: String,
        /// Response for matching prompts
        response: MockResponse,
    },
}

/// One recorded call.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedCall {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub reference_labels: Vec<String>,
}

/// Image generator that records every call.
pub struct MockImageGenerator {
    behavior: MockBehavior,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

#[allow(dead_code)]
impl MockImageGenerator {
    /// Always return an image.
    pub fn new_success() -> Self {
        Self::new_with_behavior(MockBehavior::Always(MockResponse::Image))
    }

    /// Always return `response`.
    pub fn new_always(response: MockResponse) -> Self {
        Self::new_with_behavior(MockBehavior::Always(response))
    }

    /// Fail prompts that contain `marker`.
    pub fn new_failing_on(marker: impl Into<String>, response: MockResponse) -> Self {
        Self::new_with_behavior(MockBehavior::FailMatching {
            marker: marker.into(),
            response,
        })
    }

    /// Answer with `responses` in order.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of generate_image calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Prompts of every call made so far.
    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    fn respond(response: &MockResponse) -> Result<Option<ImageData>, ImageApiError> {
        match response {
            MockResponse::Image => Ok(Some(ImageData::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]))),
            MockResponse::Empty => Ok(None),
            MockResponse::Error(kind) => Err(ImageApiError::new(kind.clone())),
        }
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        references: &[ReferenceImage],
    ) -> Result<Option<ImageData>, ImageApiError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                aspect_ratio,
                reference_labels: references.iter().map(|r| r.label.clone()).collect(),
            });
            calls.len() - 1
        };

        match &self.behavior {
            MockBehavior::Always(response) => Self::respond(response),
            MockBehavior::Sequence(responses) => match responses.get(index) {
                Some(response) => Self::respond(response),
                None => Self::respond(&MockResponse::Image),
            },
            MockBehavior::FailMatching { marker, response } => {
                if prompt.contains(marker.as_str()) {
                    Self::respond(response)
                } else {
                    Self::respond(&MockResponse::Image)
                }
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-image"
    }
}
