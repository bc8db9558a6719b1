// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CreateTopicRequest, DeleteTopicRequest, DeleteTopicResponse, Topic, TopicListResponse,
        TopicResponse, UpdateTopicRequest,
    },
    state::AppState,
};

pub mod health;
pub mod topics;
pub mod validation;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/topics",
            get(topics::list_topics).post(topics::create_topic),
        )
        .route(
            "/topics/{id}",
            get(topics::get_topic)
                .put(topics::update_topic)
                .delete(topics::delete_topic),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        topics::list_topics,
        topics::create_topic,
        topics::get_topic,
        topics::update_topic,
        topics::delete_topic,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Topic,
            TopicListResponse,
            TopicResponse,
            DeleteTopicResponse,
            CreateTopicRequest,
            UpdateTopicRequest,
            DeleteTopicRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Topics", description = "Discussion topic directory"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TopicDatabase;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let db = TopicDatabase::open(&dir.path().join("topics.redb")).unwrap();
        (dir, router(AppState::new(db)))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn topic_lifecycle_over_http() {
        let (_dir, app) = app();
        let creator = "0xAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaa";

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/topics",
                json!({"title": "Hello", "description": "First topic", "creator_address": creator}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["topic"]["id"].as_u64().unwrap();
        assert_eq!(body["topic"]["creator_address"], creator);
        assert!(body["topic"]["created_at"].is_string());

        let (status, body) = send(
            &app,
            Request::builder()
                .uri(format!("/topics/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["topic"]["title"], "Hello");

        let (status, body) = send(
            &app,
            json_request(
                Method::PUT,
                &format!("/topics/{id}"),
                json!({
                    "title": "Hi",
                    "description": "Edited",
                    "creator_address": creator.to_lowercase(),
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["topic"]["title"], "Hi");

        let (status, body) = send(
            &app,
            json_request(
                Method::DELETE,
                &format!("/topics/{id}"),
                json!({"creator_address": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Only the creator can delete this topic");

        let (status, body) = send(
            &app,
            json_request(
                Method::DELETE,
                &format!("/topics/{id}"),
                json!({"creator_address": creator}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (status, body) = send(
            &app,
            Request::builder().uri("/topics").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"topics": []}));
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        let (_dir, app) = app();
        let (status, body) = send(
            &app,
            Request::builder()
                .uri("/topics/not-a-number")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Topic not found");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request_with_json_error() {
        let (_dir, app) = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/topics")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn missing_fields_use_validation_message() {
        let (_dir, app) = app();
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/topics", json!({"title": "only a title"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Title, description, and creator address are required"
        );
    }

    #[tokio::test]
    async fn openapi_document_lists_topic_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/topics"));
        assert!(doc.paths.paths.contains_key("/topics/{id}"));
    }
}
