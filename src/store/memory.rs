use std::collections::HashMap;
use std::sync::Mutex;

use axum::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Assessment, AssessmentUpdate, Store, StoreError, SurveyResponse, User};

/// In-memory backend. Used for local development and tests; holds everything
/// behind one mutex, which is fine for the request volumes it is meant for.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    assessments: HashMap<Uuid, Assessment>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

/// Most-recent-first: `(created_at, id)` descending. The id tie-break keeps
/// the order deterministic when two rows share a timestamp.
pub(crate) fn most_recent_first(assessments: &mut [Assessment]) {
    assessments.sort_by(|a, b| {
        (b.created_at, b.id).cmp(&(a.created_at, a.id))
    });
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let email = email.trim().to_lowercase();
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim().to_lowercase();
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn create_assessment(
        &self,
        user_id: Uuid,
        responses: Vec<SurveyResponse>,
        completed_at: Option<OffsetDateTime>,
    ) -> Result<Assessment, StoreError> {
        let assessment = Assessment {
            id: Uuid::new_v4(),
            user_id,
            responses,
            results: None,
            completed_at,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().assessments.insert(assessment.id, assessment.clone());
        Ok(assessment)
    }

    async fn update_assessment(
        &self,
        id: Uuid,
        update: AssessmentUpdate,
    ) -> Result<Option<Assessment>, StoreError> {
        let mut inner = self.lock();
        let Some(assessment) = inner.assessments.get_mut(&id) else {
            return Ok(None);
        };
        if update.results.is_some() {
            assessment.results = update.results;
        }
        if update.completed_at.is_some() {
            assessment.completed_at = update.completed_at;
        }
        Ok(Some(assessment.clone()))
    }

    async fn assessments_by_user(&self, user_id: Uuid) -> Result<Vec<Assessment>, StoreError> {
        let mut rows: Vec<Assessment> = self
            .lock()
            .assessments
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        most_recent_first(&mut rows);
        Ok(rows)
    }

    async fn latest_assessment_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Assessment>, StoreError> {
        Ok(self.assessments_by_user(user_id).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn response(q: &str, a: &str) -> SurveyResponse {
        SurveyResponse {
            question: serde_json::json!(q),
            answer: serde_json::json!(a),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let store = MemStore::new();
        store.create_user("Jo@Example.com", "hash").await.unwrap();
        let err = store.create_user("jo@example.COM", "hash2").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn emails_are_normalized_on_write_and_lookup() {
        let store = MemStore::new();
        let user = store.create_user("  Jo@Example.com ", "hash").await.unwrap();
        assert_eq!(user.email, "jo@example.com");
        let found = store.user_by_email("JO@EXAMPLE.COM").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
        let by_id = store.user_by_id(user.id).await.unwrap();
        assert_eq!(by_id.unwrap().email, "jo@example.com");
        assert!(store.user_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn assessment_starts_without_results() {
        let store = MemStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        let created = store
            .create_assessment(user.id, vec![response("q1", "a1")], None)
            .await
            .unwrap();
        assert!(created.results.is_none());
        assert!(created.completed_at.is_none());
    }

    #[tokio::test]
    async fn update_merges_and_is_idempotent() {
        let store = MemStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        let created = store
            .create_assessment(user.id, vec![response("q1", "a1")], None)
            .await
            .unwrap();

        let results = crate::ai::types::test_analysis();
        let update = AssessmentUpdate {
            results: Some(results.clone()),
            completed_at: Some(OffsetDateTime::now_utc()),
        };
        let first = store
            .update_assessment(created.id, update.clone())
            .await
            .unwrap()
            .unwrap();
        let second = store
            .update_assessment(created.id, update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.results, second.results);
        assert_eq!(first.completed_at, second.completed_at);
        // Untouched fields survive the merge.
        assert_eq!(second.responses, created.responses);
    }

    #[tokio::test]
    async fn update_of_unknown_id_returns_none() {
        let store = MemStore::new();
        let updated = store
            .update_assessment(Uuid::new_v4(), AssessmentUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn listing_is_most_recent_first_with_deterministic_ties() {
        let store = MemStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        for i in 0..3 {
            store
                .create_assessment(user.id, vec![response("q", &format!("a{i}"))], None)
                .await
                .unwrap();
        }

        let listed = store.assessments_by_user(user.id).await.unwrap();
        assert_eq!(listed.len(), 3);
        let mut expected = listed.clone();
        most_recent_first(&mut expected);
        assert_eq!(
            listed.iter().map(|a| a.id).collect::<Vec<_>>(),
            expected.iter().map(|a| a.id).collect::<Vec<_>>()
        );

        let latest = store.latest_assessment_by_user(user.id).await.unwrap().unwrap();
        assert_eq!(latest.id, listed[0].id);
    }

    #[test]
    fn tie_break_is_highest_id() {
        let now = OffsetDateTime::now_utc();
        let make = |id: Uuid, created_at| Assessment {
            id,
            user_id: Uuid::new_v4(),
            responses: vec![],
            results: None,
            completed_at: None,
            created_at,
        };
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        let mut rows = vec![
            make(low, now),
            make(high, now),
            make(Uuid::from_u128(3), now - Duration::hours(1)),
        ];
        most_recent_first(&mut rows);
        assert_eq!(rows[0].id, high);
        assert_eq!(rows[1].id, low);
        assert_eq!(rows[2].id, Uuid::from_u128(3));
    }
}
