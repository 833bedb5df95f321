//! Pulling JSON out of model text.

use serde::de::DeserializeOwned;
use storyboard_error::{ImageApiError, ImageApiErrorKind};

/// Parse model output as JSON, accepting either a bare document or one
/// wrapped in a fenced ```` ```json ```` block.
///
/// # Examples
///
/// ```
/// use storyboard_models::extract_json;
///
/// let fenced = "Here you go:\n```json\n[\"a\", \"b\"]\n```";
/// let scenes: Vec<String> = extract_json(fenced).unwrap();
/// assert_eq!(scenes, vec!["a", "b"]);
///
/// let bare: Vec<String> = extract_json(" [\"c\"] ").unwrap();
/// assert_eq!(bare, vec!["c"]);
/// ```
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, ImageApiError> {
    let body = fenced_block(text).unwrap_or(text).trim();
    serde_json::from_str(body).map_err(|e| {
        ImageApiError::new(ImageApiErrorKind::MalformedResponse(format!(
            "Could not parse JSON ({}): {}",
            e,
            preview(body)
        )))
    })
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(&rest[..end])
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    match text.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
