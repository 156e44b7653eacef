//! Gemini REST client for outpainting and composition analysis.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use log::{debug, info};
use reqwest::Client;
use serde_json::{Value, json};

use super::{AnalysisClient, GenerateContentResponse, GenerationClient, GenerationRequest};
use crate::config::GeminiConfig;
use crate::error::{ResizeError, ResizeResult};

const ANALYSIS_PROMPT: &str = "Analyze the composition of this image. Describe the main subject, \
its placement (e.g., rule of thirds, centered), and the overall visual flow. Be concise and focus \
on photographic composition elements.";

/// Client for `models/*:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    api_base: String,
    generation_model: String,
    analysis_model: String,
}

impl GeminiClient {
    /// Build a client. The key is only checked for non-emptiness.
    pub fn new(api_key: &str, config: &GeminiConfig) -> ResizeResult<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ResizeError::missing_credential("remote generation"));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ResizeError::from)?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            generation_model: config.generation_model.clone(),
            analysis_model: config.analysis_model.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    async fn generate_content(
        &self,
        operation: &str,
        model: &str,
        body: &Value,
    ) -> ResizeResult<GenerateContentResponse> {
        debug!("{}: POST {}", operation, self.endpoint(model));
        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| ResizeError::from(e).with_operation(operation))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ResizeError::from(e).with_operation(operation))?;

        if !status.is_success() {
            return Err(ResizeError::http_status(
                operation,
                status.as_u16(),
                api_error_message(&text, status.canonical_reason()),
            ));
        }

        serde_json::from_str(&text).map_err(|e| ResizeError::from(e).with_operation(operation))
    }
}

/// Message from a `{"error": {"message": ..}}` body, else the status reason.
fn api_error_message(body: &str, reason: Option<&str>) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| reason.unwrap_or("unexpected response").to_string())
}

fn image_request_body(image: &[u8], mime_type: &str, prompt: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                {
                    "inlineData": {
                        "mimeType": mime_type,
                        "data": general_purpose::STANDARD.encode(image),
                    }
                },
                { "text": prompt },
            ]
        }]
    })
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> ResizeResult<GenerateContentResponse> {
        info!(
            "Requesting outpaint from {} ({} bytes {})",
            self.generation_model,
            request.image.len(),
            request.mime_type
        );
        let mut body = image_request_body(&request.image, &request.mime_type, &request.prompt);
        body["generationConfig"] = json!({ "responseModalities": ["IMAGE", "TEXT"] });
        self.generate_content("generate", &self.generation_model, &body).await
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> ResizeResult<String> {
        let body = image_request_body(image, mime_type, ANALYSIS_PROMPT);
        let response = self.generate_content("analyze", &self.analysis_model, &body).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(ResizeError::transport("analyze", "response contained no text"));
        }
        Ok(text)
    }
}
