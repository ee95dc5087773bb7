use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::dto::{AuthResponse, CredentialsRequest, MessageResponse, PublicUser};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use crate::{
    error::ApiError,
    state::AppState,
    store::{Store, User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn auth_response(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let token = JwtKeys::from_ref(state).sign(user.id)?;
    Ok(AuthResponse {
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
        token,
    })
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(mut payload): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    let hash = hash_password(&payload.password)?;
    // Uniqueness is enforced by the store, so a concurrent signup with the
    // same email still maps to DuplicateEmail rather than a 500.
    let user = state.store.create_user(&payload.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(Json(auth_response(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(mut payload): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = state
        .store
        .user_by_email(&payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "signin unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user signed in");
    Ok(Json(auth_response(&state, user)?))
}

/// Stateless: the client discards its token.
pub async fn sign_out() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Signed out successfully".into(),
    })
}
