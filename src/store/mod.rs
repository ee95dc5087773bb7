use axum::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
mod types;

pub use memory::MemStore;
pub use postgres::PgStore;
pub use types::{Assessment, AssessmentUpdate, SurveyResponse, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence seam for users and assessments. One backend is selected at
/// startup (`STORE_BACKEND`) and carried in `AppState` as `Arc<dyn Store>`.
///
/// Emails are lowercase-normalized on write and lookup, and duplicates fail
/// with `StoreError::DuplicateEmail` rather than a generic database error.
/// Listings are most-recent-first, ordered by `(created_at, id)` descending
/// so ties break deterministically on the highest id.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Creates an assessment with `results = None`. Results are only ever
    /// attached afterwards via `update_assessment`.
    async fn create_assessment(
        &self,
        user_id: Uuid,
        responses: Vec<SurveyResponse>,
        completed_at: Option<OffsetDateTime>,
    ) -> Result<Assessment, StoreError>;

    /// Merges the given fields into an existing assessment and returns the
    /// updated record, or `None` when the id is unknown.
    async fn update_assessment(
        &self,
        id: Uuid,
        update: AssessmentUpdate,
    ) -> Result<Option<Assessment>, StoreError>;

    async fn assessments_by_user(&self, user_id: Uuid) -> Result<Vec<Assessment>, StoreError>;

    async fn latest_assessment_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Assessment>, StoreError>;
}
