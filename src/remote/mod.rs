//! # Remote Generation
//!
//! Contracts for the generative image service and the wire types of its responses.
//!
//! - [`GenerationClient`]: sends a padded image plus prompt, returns the raw response
//! - [`AnalysisClient`]: describes an image's composition as plain text
//! - [`gemini::GeminiClient`]: implementation of both against the Gemini REST API
//!
//! The response is returned unclassified; deciding whether it holds an image is
//! the outpaint pipeline's job.

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ResizeResult;

pub use gemini::GeminiClient;

/// Shown when composition analysis fails for any reason.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "An error occurred while analyzing the image composition.";
/// Shown when composition analysis is requested without a key.
pub const ANALYSIS_NO_KEY_MESSAGE: &str =
    "Error: API key is not configured. Please contact the administrator.";

/// One outpaint request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Encoded image bytes (PNG for padded canvases).
    pub image: Vec<u8>,
    pub mime_type: String,
    pub prompt: String,
}

/// Response body of `models/*:generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    /// Base64-encoded bytes.
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyRating {
    pub category: String,
    pub probability: String,
}

impl GenerateContentResponse {
    /// Concatenated text of every part of every candidate.
    pub fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Remote image generation.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Submit one request. Transport and API errors map to `ResizeError::Transport`.
    async fn generate(&self, request: &GenerationRequest) -> ResizeResult<GenerateContentResponse>;
}

/// Remote composition analysis. Never affects pixels.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Raw analysis call.
    async fn analyze(&self, image: &[u8], mime_type: &str) -> ResizeResult<String>;

    /// Never fails: errors degrade to [`ANALYSIS_FAILED_MESSAGE`].
    async fn describe_composition(&self, image: &[u8], mime_type: &str) -> String {
        match self.analyze(image, mime_type).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("composition analysis failed: {}", e);
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
        }
    }
}

/// Composition analysis with key handling: a missing key yields
/// [`ANALYSIS_NO_KEY_MESSAGE`] instead of a request.
pub async fn describe_composition(
    client: Option<&dyn AnalysisClient>,
    image: &[u8],
    mime_type: &str,
) -> String {
    match client {
        Some(client) => client.describe_composition(image, mime_type).await,
        None => ANALYSIS_NO_KEY_MESSAGE.to_string(),
    }
}
