use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AiError, GenerativeModel};
use axum::async_trait;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Per-call budget for the upstream model. The reference service had none;
/// without one a stuck upstream pins submissions forever.
const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Client for the Gemini `generateContent` REST API. Every call requests
/// JSON output via `responseMimeType`, matching the prompts that all demand
/// a bare JSON payload.
#[derive(Clone)]
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First non-empty text part of the first candidate, if any.
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| {
                content
                    .parts
                    .into_iter()
                    .find_map(|p| p.text.filter(|t| !t.trim().is_empty()))
            })
    }
}

impl GeminiModel {
    pub fn new(api_key: String, model: String) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(CALL_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let url = format!("{GEMINI_API_URL}/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream(format!(
                "status {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::Malformed(e.to_string()))?;

        let text = parsed
            .text()
            .ok_or_else(|| AiError::Malformed("empty response from model".into()))?;

        debug!(model = %self.model, chars = text.len(), "model reply received");
        Ok(text)
    }
}
