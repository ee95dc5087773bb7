use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{assessments, auth, roadmap, survey};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(survey::router())
                .merge(assessments::router())
                .merge(roadmap::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::ai::testing::CannedModel;
    use crate::ai::types::test_analysis;
    use crate::auth::jwt::JwtKeys;
    use crate::store::Store;
    use axum::body::Body;
    use axum::extract::FromRef;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with(model: CannedModel) -> AppState {
        AppState::fake(Arc::new(model))
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = build_app(state_with(CannedModel::unavailable()));
        let res = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn assessments_without_token_is_401() {
        let app = build_app(state_with(CannedModel::unavailable()));
        let res = app
            .oneshot(Request::get("/api/assessments").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn assessments_with_garbage_token_is_403() {
        let app = build_app(state_with(CannedModel::unavailable()));
        let res = app
            .oneshot(
                Request::get("/api/assessments")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn signup_then_signin_then_submit_flow() {
        let state = state_with(CannedModel::ok(
            &serde_json::to_string(&test_analysis()).unwrap(),
        ));
        let app = build_app(state.clone());

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/signup",
                serde_json::json!({"email": "Jo@Example.com", "password": "longenough"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let signup = body_json(res).await;
        assert_eq!(signup["user"]["email"], "jo@example.com");

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/signin",
                serde_json::json!({"email": "jo@example.com", "password": "longenough"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let token = body_json(res).await["token"].as_str().unwrap().to_string();

        let res = app
            .clone()
            .oneshot(
                Request::post("/api/survey/submit")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({"responses": [{"q": 1, "a": "Solving problems"}]})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let analysis = body_json(res).await;
        assert_eq!(analysis["careerPaths"][0]["title"], "Software Engineer");

        // The submission is visible in the listing with its results attached.
        let res = app
            .oneshot(
                Request::get("/api/assessments")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(res).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["results"]["careerPaths"][0]["match"], 92);
    }

    #[tokio::test]
    async fn duplicate_signup_is_400() {
        let app = build_app(state_with(CannedModel::unavailable()));
        let payload = serde_json::json!({"email": "dup@example.com", "password": "longenough"});

        let res = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/signup", payload.clone()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(json_request("POST", "/api/auth/signup", payload))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_with_failing_model_returns_502_and_keeps_responses() {
        let state = state_with(CannedModel::unavailable());
        let app = build_app(state.clone());

        let user = state.store.create_user("a@b.com", "hash").await.unwrap();
        let token = JwtKeys::from_ref(&state).sign(user.id).unwrap();

        let res = app
            .clone()
            .oneshot(
                Request::post("/api/survey/submit")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({"responses": [{"q": 1, "a": "x"}]}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

        let latest = state
            .store
            .latest_assessment_by_user(user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(latest.results.is_none());
        assert!(latest.completed_at.is_some());

        // And the pending row is what /api/assessment/results serves.
        let res = app
            .oneshot(
                Request::get("/api/assessment/results")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert!(body["results"].is_null());
    }

    #[tokio::test]
    async fn results_is_404_before_any_submission() {
        let state = state_with(CannedModel::unavailable());
        let app = build_app(state.clone());
        let user = state.store.create_user("a@b.com", "hash").await.unwrap();
        let token = JwtKeys::from_ref(&state).sign(user.id).unwrap();

        let res = app
            .oneshot(
                Request::get("/api/assessment/results")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn updating_another_users_assessment_is_404() {
        let state = state_with(CannedModel::unavailable());
        let app = build_app(state.clone());

        let owner = state.store.create_user("owner@b.com", "hash").await.unwrap();
        let row = state
            .store
            .create_assessment(owner.id, vec![], None)
            .await
            .unwrap();

        let intruder = state.store.create_user("other@b.com", "hash").await.unwrap();
        let token = JwtKeys::from_ref(&state).sign(intruder.id).unwrap();

        let res = app
            .oneshot(
                Request::put(format!("/api/assessments/{}", row.id))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({"results": test_analysis()}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn roadmap_requires_career_title() {
        let state = state_with(CannedModel::unavailable());
        let app = build_app(state.clone());
        let user = state.store.create_user("a@b.com", "hash").await.unwrap();
        let token = JwtKeys::from_ref(&state).sign(user.id).unwrap();

        let res = app
            .oneshot(
                Request::post("/api/roadmap/generate")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::json!({}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
