//! Gemini REST API client.

mod client;
mod dto;
mod json;

pub use client::GeminiClient;
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig, InlineData, Part, PromptFeedback,
};
pub use json::extract_json;
