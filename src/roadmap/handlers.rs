use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::ai::types::RoadmapStep;
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn roadmap_routes() -> Router<AppState> {
    Router::new().route("/roadmap/generate", post(generate))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoadmapRequest {
    #[serde(default)]
    pub career_title: String,
    #[serde(default)]
    pub user_profile: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: Vec<RoadmapStep>,
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(payload): Json<GenerateRoadmapRequest>,
) -> Result<Json<RoadmapResponse>, ApiError> {
    let title = payload.career_title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("careerTitle is required".into()));
    }

    let profile = payload.user_profile.unwrap_or(serde_json::Value::Null);
    let roadmap = state.ai.generate_roadmap(title, &profile).await?;
    Ok(Json(RoadmapResponse { roadmap }))
}
