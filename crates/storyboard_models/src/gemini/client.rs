//! Gemini client over `reqwest`.

use super::dto::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    Part,
};
use super::json::extract_json;
use crate::ImageMetrics;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use std::time::{Duration, Instant};
use storyboard_core::{AspectRatio, CharacterProfile, ImageData, ReferenceImage};
use storyboard_error::{ImageApiError, ImageApiErrorKind};
use storyboard_interface::{ImageGenerator, ScriptAnalyzer};
use storyboard_rate_limit::GeminiConfig;
use tracing::{debug, error, instrument, warn};

const PROVIDER: &str = "gemini";

/// Environment variables checked for the API key, in order.
const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Client for the Gemini `generateContent` endpoint.
///
/// Holds the credential; nothing else is shared between calls.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client cannot be built.
    #[instrument(skip(api_key, config), fields(image_model = %config.image_model))]
    pub fn new(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self, ImageApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ImageApiError::new(ImageApiErrorKind::MissingApiKey));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageApiError::new(ImageApiErrorKind::ClientCreation(e.to_string())))?;

        debug!("Created Gemini client");
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Creates a client reading the key from `GEMINI_API_KEY`, then `API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageApiErrorKind::MissingApiKey`] if neither is set.
    pub fn from_env(config: GeminiConfig) -> Result<Self, ImageApiError> {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| ImageApiError::new(ImageApiErrorKind::MissingApiKey))?;
        Self::new(api_key, config)
    }

    /// Endpoint configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Map a non-2xx response to an error kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::ImageApiErrorKind;
    /// use storyboard_models::GeminiClient;
    ///
    /// let body = r#"{"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}}"#;
    /// let kind = GeminiClient::classify_error(503, body);
    /// assert!(kind.is_retryable());
    /// ```
    pub fn classify_error(status_code: u16, body: &str) -> ImageApiErrorKind {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let mut message = envelope.error.message;
                if body.contains("API_KEY_INVALID") && !message.contains("API_KEY_INVALID") {
                    message.push_str(" (API_KEY_INVALID)");
                }
                ImageApiErrorKind::from_status(
                    status_code,
                    envelope.error.status.as_deref(),
                    message,
                )
            }
            Err(_) => ImageApiErrorKind::from_status(status_code, None, body.trim()),
        }
    }

    /// Send one `generateContent` request.
    #[instrument(skip(self, request), fields(model = %model))]
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ImageApiError> {
        let metrics = ImageMetrics::get();
        let started = Instant::now();

        let result = self.send(model, request).await;
        match &result {
            Ok(_) => {
                metrics.record_request(PROVIDER, model, started.elapsed().as_secs_f64());
            }
            Err(e) => {
                metrics.record_error(PROVIDER, model, e.kind.label());
            }
        }
        result
    }

    async fn send(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ImageApiError> {
        let url = self.endpoint(model);
        debug!(url = %url, "Sending request to Gemini");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                ImageApiError::new(ImageApiErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let kind = Self::classify_error(status.as_u16(), &error_text);
            warn!(status = %status, kind = kind.label(), "Gemini API error");
            return Err(ImageApiError::new(kind));
        }

        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read response");
            ImageApiError::new(ImageApiErrorKind::Transport(format!(
                "Failed to read response: {}",
                e
            )))
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, "Failed to parse response JSON");
            ImageApiError::new(ImageApiErrorKind::MalformedResponse(e.to_string()))
        })
    }

    /// Send a text-only analysis request and return the model's text.
    async fn generate_text(
        &self,
        parts: Vec<Part>,
        config: Option<GenerationConfig>,
    ) -> Result<String, ImageApiError> {
        let mut request = GenerateContentRequest::user(parts);
        if let Some(config) = config {
            request = request.with_config(config);
        }

        let response = self
            .generate_content(&self.config.text_model, &request)
            .await?;
        if let Some(reason) = response.block_reason() {
            return Err(ImageApiError::new(ImageApiErrorKind::ContentBlocked(reason)));
        }

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ImageApiError::new(ImageApiErrorKind::MalformedResponse(
                "Response contained no text".to_string(),
            )));
        }
        Ok(text)
    }

    fn json_config(schema: serde_json::Value) -> GenerationConfig {
        GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }
}

fn character_prompt(script: &str, as_animals: bool) -> String {
    let cast = if as_animals {
        "Recast every main character as a cute, lovable animal whose species suits the \
         character's role and personality. For each one give:\n\
         - name: the name or role from the script followed by the animal (e.g. \"Doctor Cat\")\n\
         - description: a concrete look (species, fur color, size, expression, distinctive cute details)"
    } else {
        "Identify every main character. Match the script's era, genre, and mood, and keep \
         the characters Korean. For each one give:\n\
         - name: the name or role used in the script\n\
         - description: a concrete look (age range, clothing, expression, build, hairstyle)"
    };
    format!(
        "Analyze the following script in detail. Work out each character's role, age, and \
         personality from context.\n\n{}\n\nReturn a JSON array: [{{\"name\": string, \
         \"description\": string}}]\n\nScript:\n\n{}",
        cast, script
    )
}

fn scene_prompt(script: &str, count: usize) -> String {
    format!(
        "Analyze the following script and split it into {} key visual scenes. For each \
         scene write a short, descriptive caption in the script's language that can be used \
         as an image generation prompt. Return a JSON array of strings: \
         [\"scene 1 caption\", \"scene 2 caption\", ...]\n\nScript:\n\n{}",
        count, script
    )
}

const REFERENCE_PROMPT: &str = "Describe the person in this image in close detail: face \
shape, eyes, nose, lips, skin tone, hairstyle, hair color, expression, head angle, gaze \
direction, and clothing style. The description will be used to generate new images of the \
same person.";

#[async_trait]
impl ImageGenerator for GeminiClient {
    #[instrument(skip(self, prompt, references), fields(aspect_ratio = %aspect_ratio, references = references.len()))]
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        references: &[ReferenceImage],
    ) -> Result<Option<ImageData>, ImageApiError> {
        let mut parts = Vec::with_capacity(references.len() * 2 + 1);
        for reference in references {
            parts.push(Part::inline(
                reference.image.mime_type.clone(),
                STANDARD.encode(&reference.image.bytes),
            ));
            parts.push(Part::text(reference.label.clone()));
        }
        parts.push(Part::text(prompt));

        let request = GenerateContentRequest::user(parts).with_config(GenerationConfig {
            response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
            }),
            ..Default::default()
        });

        let response = self
            .generate_content(&self.config.image_model, &request)
            .await?;

        if let Some(inline) = response.first_image() {
            let bytes = STANDARD
                .decode(inline.data.as_bytes())
                .map_err(|e| ImageApiError::new(ImageApiErrorKind::Base64Decode(e.to_string())))?;
            debug!(bytes = bytes.len(), mime_type = %inline.mime_type, "Received image");
            return Ok(Some(ImageData::new(inline.mime_type.clone(), bytes)));
        }

        if let Some(reason) = response.block_reason() {
            warn!(reason = %reason, "Image blocked by safety filter");
            return Err(ImageApiError::new(ImageApiErrorKind::ContentBlocked(reason)));
        }

        warn!("Response contained no image data");
        ImageMetrics::get().record_empty(PROVIDER, &self.config.image_model);
        Ok(None)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.config.image_model
    }
}

#[async_trait]
impl ScriptAnalyzer for GeminiClient {
    #[instrument(skip(self, script), fields(script_len = script.len()))]
    async fn analyze_characters(
        &self,
        script: &str,
        as_animals: bool,
    ) -> Result<Vec<CharacterProfile>, ImageApiError> {
        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "description": { "type": "STRING" }
                },
                "required": ["name", "description"]
            }
        });

        let text = self
            .generate_text(
                vec![Part::text(character_prompt(script, as_animals))],
                Some(Self::json_config(schema)),
            )
            .await?;

        let characters: Vec<CharacterProfile> = extract_json(&text)?;
        let characters: Vec<_> = characters
            .into_iter()
            .filter(|c| !c.name.trim().is_empty())
            .collect();
        debug!(count = characters.len(), "Parsed characters");
        Ok(characters)
    }

    #[instrument(skip(self, script), fields(script_len = script.len()))]
    async fn analyze_scenes(
        &self,
        script: &str,
        count: usize,
    ) -> Result<Vec<String>, ImageApiError> {
        let schema = json!({ "type": "ARRAY", "items": { "type": "STRING" } });

        let text = self
            .generate_text(
                vec![Part::text(scene_prompt(script, count))],
                Some(Self::json_config(schema)),
            )
            .await?;

        let scenes: Vec<String> = extract_json(&text)?;
        let scenes: Vec<_> = scenes
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        debug!(count = scenes.len(), "Parsed scenes");
        Ok(scenes)
    }

    #[instrument(skip(self, image), fields(bytes = image.bytes.len()))]
    async fn describe_reference(&self, image: &ImageData) -> Result<String, ImageApiError> {
        let parts = vec![
            Part::text(REFERENCE_PROMPT),
            Part::inline(image.mime_type.clone(), STANDARD.encode(&image.bytes)),
        ];
        let text = self.generate_text(parts, None).await?;
        Ok(text.trim().to_string())
    }
}
