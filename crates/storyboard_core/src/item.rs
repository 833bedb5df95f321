//! Generated items and image payloads.

use crate::GenerationRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageData {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Decoded bytes
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ImageData {
    /// Creates image data from a MIME type and bytes.
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// True when no bytes were returned.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    /// Guess the MIME type from a file extension.
    pub fn mime_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "image/png",
        }
    }
}

/// A word swapped out to get past a content filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordReplacement {
    /// Word found in the text
    pub original: String,
    /// Neutral word used instead
    pub replacement: String,
}

/// One entry of a batch result.
///
/// `image_data` is `None` for scene placeholders whose generation failed
/// after the fallback. That is a valid terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedItem {
    /// Unique identifier
    pub id: Uuid,
    /// Zero-based position in the batch
    pub position: usize,
    /// Subject the image depicts
    pub subject_name: String,
    /// Prompt of the call that produced the image (or the last one tried)
    pub prompt_used: String,
    /// Image, or `None` for a placeholder
    pub image_data: Option<ImageData>,
    /// Character description or scene text
    pub description_or_scene: String,
    /// True when the simplified fallback prompt produced the image
    pub used_fallback: bool,
    /// Words replaced to satisfy the content filter
    #[serde(default)]
    pub replacements: Vec<WordReplacement>,
}

impl GeneratedItem {
    /// A successful item for `request`.
    pub fn success(
        position: usize,
        request: &GenerationRequest,
        prompt_used: impl Into<String>,
        image: ImageData,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            subject_name: request.subject_name.clone(),
            prompt_used: prompt_used.into(),
            image_data: Some(image),
            description_or_scene: request.prompt_seed.clone(),
            used_fallback: false,
            replacements: Vec::new(),
        }
    }

    /// An empty-image entry keeping the original text.
    pub fn placeholder(
        position: usize,
        request: &GenerationRequest,
        prompt_used: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            subject_name: request.subject_name.clone(),
            prompt_used: prompt_used.into(),
            image_data: None,
            description_or_scene: request.prompt_seed.clone(),
            used_fallback: false,
            replacements: Vec::new(),
        }
    }

    /// True when the item carries an image.
    pub fn has_image(&self) -> bool {
        self.image_data.as_ref().is_some_and(|image| !image.is_empty())
    }
}
