use axum::async_trait;
use thiserror::Error;

pub mod gateway;
mod gemini;
pub mod prompts;
pub mod types;

pub use gateway::CareerAi;
pub use gemini::GeminiModel;

/// Gateway failure modes. `Upstream` is the network/service call itself
/// failing; `Malformed` is the service answering with something that is not
/// the JSON we asked for. Callers pick different remediation for the two
/// (a retry can help the first, never the second).
#[derive(Debug, Error)]
pub enum AiError {
    #[error("generative model unavailable: {0}")]
    Upstream(String),
    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// Raw text-generation seam. `GeminiModel` is the production implementation;
/// tests substitute canned models. No other module talks to the model API
/// directly.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Sends one prompt and returns the raw text of the model's reply.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
