//! Characters extracted from a script.

use serde::{Deserialize, Serialize};

/// A character as returned by script analysis.
///
/// # Examples
///
/// ```
/// use storyboard_core::CharacterProfile;
///
/// let json = r#"{"name": "Jisoo", "description": "A retired detective"}"#;
/// let profile: CharacterProfile = serde_json::from_str(json).unwrap();
/// assert_eq!(profile.name, "Jisoo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Character name
    pub name: String,
    /// Appearance, age, role
    pub description: String,
}

impl CharacterProfile {
    /// Creates a new profile.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
