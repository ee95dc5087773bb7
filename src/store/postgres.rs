use axum::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Assessment, AssessmentUpdate, Store, StoreError, SurveyResponse, User};
use crate::ai::types::CareerAnalysis;

/// Postgres backend. Schema lives in `migrations/`; JSON columns hold the
/// typed responses/results payloads.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AssessmentRow {
    id: Uuid,
    user_id: Uuid,
    responses: Json<Vec<SurveyResponse>>,
    results: Option<Json<CareerAnalysis>>,
    completed_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
}

impl From<AssessmentRow> for Assessment {
    fn from(r: AssessmentRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            responses: r.responses.0,
            results: r.results.map(|j| j.0),
            completed_at: r.completed_at,
            created_at: r.created_at,
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let email = email.trim().to_lowercase();
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(&email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim().to_lowercase();
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_assessment(
        &self,
        user_id: Uuid,
        responses: Vec<SurveyResponse>,
        completed_at: Option<OffsetDateTime>,
    ) -> Result<Assessment, StoreError> {
        let row = sqlx::query_as::<_, AssessmentRow>(
            r#"
            INSERT INTO assessments (user_id, responses, completed_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, responses, results, completed_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(Json(responses))
        .bind(completed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_assessment(
        &self,
        id: Uuid,
        update: AssessmentUpdate,
    ) -> Result<Option<Assessment>, StoreError> {
        // COALESCE keeps untouched fields, making the merge idempotent.
        let row = sqlx::query_as::<_, AssessmentRow>(
            r#"
            UPDATE assessments
            SET results = COALESCE($2, results),
                completed_at = COALESCE($3, completed_at)
            WHERE id = $1
            RETURNING id, user_id, responses, results, completed_at, created_at
            "#,
        )
        .bind(id)
        .bind(update.results.map(Json))
        .bind(update.completed_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn assessments_by_user(&self, user_id: Uuid) -> Result<Vec<Assessment>, StoreError> {
        let rows = sqlx::query_as::<_, AssessmentRow>(
            r#"
            SELECT id, user_id, responses, results, completed_at, created_at
            FROM assessments
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn latest_assessment_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Assessment>, StoreError> {
        let row = sqlx::query_as::<_, AssessmentRow>(
            r#"
            SELECT id, user_id, responses, results, completed_at, created_at
            FROM assessments
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }
}
