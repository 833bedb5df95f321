//! Mock script analyzer.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use storyboard_core::{CharacterProfile, ImageData};
use storyboard_error::{ImageApiError, ImageApiErrorKind};
use storyboard_interface::ScriptAnalyzer;

/// Analyzer returning canned characters and scenes.
pub struct MockScriptAnalyzer {
    characters: Vec<CharacterProfile>,
    scenes: Vec<String>,
    reference: Result<String, ImageApiErrorKind>,
    call_count: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockScriptAnalyzer {
    /// Characters named `Char1`..`CharN`.
    pub fn with_characters(count: usize) -> Self {
        let characters = (1..=count)
            .map(|n| CharacterProfile::new(format!("Char{}", n), format!("Description of character {}", n)))
            .collect();
        Self {
            characters,
            scenes: Vec::new(),
            reference: Ok("Oval face, short black hair, round glasses".to_string()),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Canned scene list.
    pub fn with_scenes(scenes: Vec<String>) -> Self {
        Self {
            characters: Vec::new(),
            scenes,
            reference: Ok(String::new()),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Make reference analysis fail with `kind`.
    pub fn failing_reference(mut self, kind: ImageApiErrorKind) -> Self {
        self.reference = Err(kind);
        self
    }

    /// Number of analyzer calls of any kind.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn record(&self) {
        *self.call_count.lock().unwrap() += 1;
    }
}

#[async_trait]
impl ScriptAnalyzer for MockScriptAnalyzer {
    async fn analyze_characters(
        &self,
        _script: &str,
        _as_animals: bool,
    ) -> Result<Vec<CharacterProfile>, ImageApiError> {
        self.record();
        Ok(self.characters.clone())
    }

    async fn analyze_scenes(
        &self,
        _script: &str,
        count: usize,
    ) -> Result<Vec<String>, ImageApiError> {
        self.record();
        Ok(self.scenes.iter().take(count).cloned().collect())
    }

    async fn describe_reference(&self, _image: &ImageData) -> Result<String, ImageApiError> {
        self.record();
        self.reference.clone().map_err(ImageApiError::new)
    }
}
