use serde::Deserialize;
use time::OffsetDateTime;

use crate::ai::types::CareerAnalysis;
use crate::store::SurveyResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub responses: Vec<SurveyResponse>,
    #[serde(default)]
    pub results: Option<CareerAnalysis>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssessmentRequest {
    pub results: CareerAnalysis,
}
