use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;

use super::prompts;
use super::types::{CareerAnalysis, Question, RoadmapStep};
use super::{AiError, GenerativeModel};
use crate::store::SurveyResponse;

/// Translates domain requests into the model's prompt/response contract and
/// back, isolating everything else from that contract's instability. All
/// three operations share one shape: build prompt, call the model, strictly
/// parse the expected JSON.
///
/// The gateway never retries; retry policy belongs to its callers, which can
/// tell a transient `Upstream` failure from a hopeless `Malformed` one.
#[derive(Clone)]
pub struct CareerAi {
    model: Arc<dyn GenerativeModel>,
}

impl CareerAi {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self, responses), fields(response_count = responses.len()))]
    pub async fn analyze_career_fit(
        &self,
        responses: &[SurveyResponse],
    ) -> Result<CareerAnalysis, AiError> {
        let prompt = prompts::career_analysis(responses);
        let text = self.model.generate(&prompt).await?;
        let analysis: CareerAnalysis = parse_payload(&text)?;
        analysis.validate().map_err(AiError::Malformed)?;
        Ok(analysis)
    }

    #[instrument(skip(self, previous_answers), fields(previous_count = previous_answers.len()))]
    pub async fn generate_questions(
        &self,
        previous_answers: &[SurveyResponse],
    ) -> Result<Vec<Question>, AiError> {
        let prompt = prompts::career_questions(previous_answers);
        let text = self.model.generate(&prompt).await?;
        let questions: Vec<Question> = parse_payload(&text)?;
        if questions.is_empty() {
            return Err(AiError::Malformed("model returned no questions".into()));
        }
        Ok(questions)
    }

    #[instrument(skip(self, profile))]
    pub async fn generate_roadmap(
        &self,
        career_title: &str,
        profile: &serde_json::Value,
    ) -> Result<Vec<RoadmapStep>, AiError> {
        let prompt = prompts::career_roadmap(career_title, profile);
        let text = self.model.generate(&prompt).await?;
        let mut steps: Vec<RoadmapStep> = parse_payload(&text)?;
        if steps.is_empty() {
            return Err(AiError::Malformed("model returned no roadmap steps".into()));
        }
        // A fresh roadmap has nothing done yet, whatever the model claims.
        for step in &mut steps {
            step.completed = false;
        }
        Ok(steps)
    }
}

fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(AiError::Malformed("empty response from model".into()));
    }
    serde_json::from_str(text).map_err(|e| AiError::Malformed(e.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` fences; models wrap JSON in them
/// despite instructions not to.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| stripped.trim_start())
    } else {
        text
    }
}
