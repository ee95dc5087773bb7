use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{QuestionsResponse, SubmitSurveyRequest};
use super::service;
use crate::ai::types::CareerAnalysis;
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Store;

pub fn survey_routes() -> Router<AppState> {
    Router::new()
        .route("/survey/submit", post(submit))
        .route("/survey/questions", get(questions))
}

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SubmitSurveyRequest>,
) -> Result<Json<CareerAnalysis>, ApiError> {
    let analysis =
        service::submit_survey(state.store.as_ref(), &state.ai, user_id, payload.responses)
            .await?;
    Ok(Json(analysis))
}

/// The user's most recent submission (if any) seeds the prompt so follow-up
/// questions do not repeat what was already asked.
#[instrument(skip(state))]
pub async fn questions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let previous = state
        .store
        .latest_assessment_by_user(user_id)
        .await?
        .map(|a| a.responses)
        .unwrap_or_default();

    let questions = state.ai.generate_questions(&previous).await?;
    Ok(Json(QuestionsResponse { questions }))
}
