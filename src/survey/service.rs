use time::OffsetDateTime;
use tracing::{error, info};
use uuid::Uuid;

use crate::ai::types::CareerAnalysis;
use crate::ai::CareerAi;
use crate::error::ApiError;
use crate::store::{AssessmentUpdate, Store, SurveyResponse};

/// Runs one submission end to end: persist first, analyze second, attach
/// results last.
///
/// The assessment row is written before the model is called, so the user's
/// responses survive an analysis failure. On failure the row stays completed
/// with `results = None` (the recoverable state) and the error is surfaced;
/// partial results are never stored.
pub async fn submit_survey(
    store: &dyn Store,
    ai: &CareerAi,
    user_id: Uuid,
    responses: Vec<SurveyResponse>,
) -> Result<CareerAnalysis, ApiError> {
    if responses.is_empty() {
        return Err(ApiError::Validation("responses must not be empty".into()));
    }

    let assessment = store
        .create_assessment(user_id, responses, Some(OffsetDateTime::now_utc()))
        .await?;
    info!(assessment_id = %assessment.id, %user_id, "assessment persisted");

    let analysis = match ai.analyze_career_fit(&assessment.responses).await {
        Ok(analysis) => analysis,
        Err(e) => {
            error!(assessment_id = %assessment.id, error = %e, "analysis failed; responses kept");
            return Err(e.into());
        }
    };

    store
        .update_assessment(
            assessment.id,
            AssessmentUpdate {
                results: Some(analysis.clone()),
                completed_at: None,
            },
        )
        .await?;
    info!(assessment_id = %assessment.id, "analysis attached");

    Ok(analysis)
}
