use serde::{Deserialize, Serialize};

use crate::ai::types::Question;
use crate::store::SurveyResponse;

#[derive(Debug, Deserialize)]
pub struct SubmitSurveyRequest {
    pub responses: Vec<SurveyResponse>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}
