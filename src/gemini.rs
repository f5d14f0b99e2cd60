//! Gemini API client
//!
//! Single-turn text generation: one prompt in, the first candidate's text out.

use crate::error::InsightError;
use crate::transport::HttpTransport;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

pub struct GeminiClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    url: String,
}

impl GeminiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, url: String, api_key: String) -> Self {
        Self {
            transport,
            api_key,
            url,
        }
    }

    /// Generate a completion for `prompt`
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(InsightError::LlmError(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        info!("Calling Gemini API");

        let body = serde_json::to_value(&request)?;
        let raw = self
            .transport
            .post_json(&self.url, &vec![("key", self.api_key.clone())], &body)
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                e
            })?;

        let response: GeminiResponse = serde_json::from_value(raw).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            InsightError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        let answer = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| InsightError::LlmError("Empty response from Gemini".to_string()))?;

        info!(chars = answer.len(), "Gemini response received");

        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
