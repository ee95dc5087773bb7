use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ai::types::CareerAnalysis;

/// User record. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One question/answer pair from the survey. The question and answer values
/// are opaque JSON; only the pair shape is enforced. Accepts the compact
/// `{"q": ..., "a": ...}` form clients send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    #[serde(alias = "q")]
    pub question: serde_json::Value,
    #[serde(alias = "a")]
    pub answer: serde_json::Value,
}

/// One survey submission plus its (possibly pending) analysis.
///
/// `completed_at` set with `results` still `None` is the documented
/// recoverable state: the submission survived an analysis failure and can be
/// re-analyzed later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub responses: Vec<SurveyResponse>,
    pub results: Option<CareerAnalysis>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Partial update applied to an assessment. `None` fields are left untouched,
/// so re-applying the same update is a no-op.
#[derive(Debug, Clone, Default)]
pub struct AssessmentUpdate {
    pub results: Option<CareerAnalysis>,
    pub completed_at: Option<OffsetDateTime>,
}
