use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateAssessmentRequest, UpdateAssessmentRequest};
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{Assessment, AssessmentUpdate, Store};

pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/assessments", post(create).get(list))
        .route("/assessments/:id", put(update))
        .route("/assessment/results", get(results))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<Assessment>), ApiError> {
    let assessment = state
        .store
        .create_assessment(user_id, payload.responses, payload.completed_at)
        .await?;

    // Results never ride along on insert; when the client supplies them they
    // are attached through the same merge path the orchestrator uses.
    let assessment = match payload.results {
        Some(results) => state
            .store
            .update_assessment(
                assessment.id,
                AssessmentUpdate {
                    results: Some(results),
                    completed_at: None,
                },
            )
            .await?
            .unwrap_or(assessment),
        None => assessment,
    };

    Ok((StatusCode::CREATED, Json(assessment)))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Assessment>>, ApiError> {
    let assessments = state.store.assessments_by_user(user_id).await?;
    Ok(Json(assessments))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssessmentRequest>,
) -> Result<Json<Assessment>, ApiError> {
    // Rows of other users are invisible here, not just forbidden.
    let owned = state
        .store
        .assessments_by_user(user_id)
        .await?
        .iter()
        .any(|a| a.id == id);
    if !owned {
        return Err(ApiError::NotFound("Assessment not found".into()));
    }

    let updated = state
        .store
        .update_assessment(
            id,
            AssessmentUpdate {
                results: Some(payload.results),
                completed_at: None,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".into()))?;

    Ok(Json(updated))
}

/// Latest assessment for the authenticated user, completed or still pending
/// analysis.
#[instrument(skip(state))]
pub async fn results(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Assessment>, ApiError> {
    state
        .store
        .latest_assessment_by_user(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No assessment found".into()))
}
