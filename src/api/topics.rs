// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Topic directory endpoints.
//!
//! Mutations are authorized by comparing the `creator_address` claimed in the
//! request body with the stored creator, ignoring case. The claim is not
//! proven by a signature.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::validation::{parse_topic_id, require_creator, validate_create, validate_update};
use crate::{
    error::ApiError,
    models::{
        CreateTopicRequest, DeleteTopicRequest, DeleteTopicResponse, TopicListResponse,
        TopicResponse, UpdateTopicRequest,
    },
    state::AppState,
    storage::TopicDbError,
};

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            ApiError::bad_request(format!("Invalid JSON body: {}", rejection.body_text()))
        })
}

/// Map a storage failure to the response for `action` ("edit" or "delete").
fn mutation_error(err: TopicDbError, action: &str, topic_id: u64) -> ApiError {
    match err {
        TopicDbError::NotFound(_) => ApiError::not_found("Topic not found"),
        TopicDbError::NotCreator(_) => {
            tracing::info!(topic_id, action, "Rejected topic mutation by non-creator");
            ApiError::forbidden(format!("Only the creator can {action} this topic"))
        }
        other => {
            tracing::error!(error = %other, topic_id, action, "Topic mutation failed");
            let verb = if action == "edit" { "update" } else { action };
            ApiError::internal(format!("Failed to {verb} topic"))
        }
    }
}

/// List all topics, newest first.
#[utoipa::path(
    get,
    path = "/topics",
    tag = "Topics",
    responses(
        (status = 200, description = "All topics, newest first", body = TopicListResponse),
        (status = 500, description = "Database not available")
    )
)]
pub async fn list_topics(
    State(state): State<AppState>,
) -> Result<Json<TopicListResponse>, ApiError> {
    let db = state.topics()?;

    let topics = db.list().map_err(|e| {
        tracing::error!(error = %e, "Failed to list topics");
        ApiError::internal("Failed to fetch topics")
    })?;

    Ok(Json(TopicListResponse { topics }))
}

/// Create a topic.
#[utoipa::path(
    post,
    path = "/topics",
    tag = "Topics",
    request_body = CreateTopicRequest,
    responses(
        (status = 201, description = "Topic created", body = TopicResponse),
        (status = 400, description = "Missing field or length exceeded"),
        (status = 500, description = "Database not available")
    )
)]
pub async fn create_topic(
    State(state): State<AppState>,
    payload: Result<Json<CreateTopicRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TopicResponse>), ApiError> {
    let db = state.topics()?;
    let new_topic = validate_create(json_body(payload)?)?;

    let topic = db.create(new_topic).map_err(|e| {
        tracing::error!(error = %e, "Failed to create topic");
        ApiError::internal("Failed to create topic")
    })?;

    tracing::info!(
        topic_id = topic.id,
        creator = %topic.creator_address,
        "Topic created"
    );

    Ok((StatusCode::CREATED, Json(TopicResponse { topic })))
}

/// Get a topic by id.
#[utoipa::path(
    get,
    path = "/topics/{id}",
    tag = "Topics",
    params(
        ("id" = u64, Path, description = "Topic id")
    ),
    responses(
        (status = 200, description = "The topic", body = TopicResponse),
        (status = 404, description = "Topic not found"),
        (status = 500, description = "Database not available")
    )
)]
pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TopicResponse>, ApiError> {
    let db = state.topics()?;
    let id = parse_topic_id(&id)?;

    let topic = db
        .get(id)
        .map_err(|e| {
            tracing::error!(error = %e, topic_id = id, "Failed to fetch topic");
            ApiError::internal("Failed to fetch topic")
        })?
        .ok_or_else(|| ApiError::not_found("Topic not found"))?;

    Ok(Json(TopicResponse { topic }))
}

/// Replace a topic's title and description. Creator only.
#[utoipa::path(
    put,
    path = "/topics/{id}",
    tag = "Topics",
    params(
        ("id" = u64, Path, description = "Topic id")
    ),
    request_body = UpdateTopicRequest,
    responses(
        (status = 200, description = "Updated topic", body = TopicResponse),
        (status = 400, description = "Missing field or length exceeded"),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Topic not found"),
        (status = 500, description = "Database not available")
    )
)]
pub async fn update_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTopicRequest>, JsonRejection>,
) -> Result<Json<TopicResponse>, ApiError> {
    let db = state.topics()?;
    let edit = validate_update(json_body(payload)?)?;
    let id = parse_topic_id(&id)?;

    let topic = db
        .update_owned(id, edit)
        .map_err(|e| mutation_error(e, "edit", id))?;

    tracing::info!(topic_id = id, "Topic updated");

    Ok(Json(TopicResponse { topic }))
}

/// Delete a topic. Creator only.
#[utoipa::path(
    delete,
    path = "/topics/{id}",
    tag = "Topics",
    params(
        ("id" = u64, Path, description = "Topic id")
    ),
    request_body = DeleteTopicRequest,
    responses(
        (status = 200, description = "Topic deleted", body = DeleteTopicResponse),
        (status = 400, description = "Creator address missing"),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Topic not found"),
        (status = 500, description = "Database not available")
    )
)]
pub async fn delete_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DeleteTopicRequest>, JsonRejection>,
) -> Result<Json<DeleteTopicResponse>, ApiError> {
    let db = state.topics()?;
    let creator_address = require_creator(json_body(payload)?.creator_address)?;
    let id = parse_topic_id(&id)?;

    db.delete_owned(id, &creator_address)
        .map_err(|e| mutation_error(e, "delete", id))?;

    tracing::info!(topic_id = id, "Topic deleted");

    Ok(Json(DeleteTopicResponse { success: true }))
}
