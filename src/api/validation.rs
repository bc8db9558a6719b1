// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request validation for topic endpoints.
//!
//! A field is "present" when it is supplied and non-empty. Lengths are
//! counted in characters, not bytes.

use crate::{
    error::ApiError,
    models::{
        CreateTopicRequest, NewTopic, TopicEdit, UpdateTopicRequest, DESCRIPTION_MAX_CHARS,
        TITLE_MAX_CHARS,
    },
};

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn check_lengths(title: &str, description: &str) -> Result<(), ApiError> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ApiError::bad_request(format!(
            "Title must be {TITLE_MAX_CHARS} characters or less"
        )));
    }
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ApiError::bad_request(format!(
            "Description must be {DESCRIPTION_MAX_CHARS} characters or less"
        )));
    }
    Ok(())
}

pub fn validate_create(request: CreateTopicRequest) -> Result<NewTopic, ApiError> {
    let (Some(title), Some(description), Some(creator_address)) = (
        present(request.title),
        present(request.description),
        present(request.creator_address),
    ) else {
        return Err(ApiError::bad_request(
            "Title, description, and creator address are required",
        ));
    };

    check_lengths(&title, &description)?;

    Ok(NewTopic {
        title,
        description,
        creator_address,
    })
}

pub fn validate_update(request: UpdateTopicRequest) -> Result<TopicEdit, ApiError> {
    let creator_address = require_creator(request.creator_address)?;

    let (Some(title), Some(description)) = (present(request.title), present(request.description))
    else {
        return Err(ApiError::bad_request("Title and description are required"));
    };

    check_lengths(&title, &description)?;

    Ok(TopicEdit {
        title,
        description,
        creator_address,
    })
}

pub fn require_creator(creator_address: Option<String>) -> Result<String, ApiError> {
    present(creator_address).ok_or_else(|| ApiError::bad_request("Creator address is required"))
}

/// Parse a path id. Anything that is not a topic id cannot name a topic, so
/// it is reported as not found rather than as a malformed request.
pub fn parse_topic_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Topic not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const CREATOR: &str = "0x1111111111111111111111111111111111111111";

    fn create(title: &str, description: &str) -> CreateTopicRequest {
        CreateTopicRequest {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            creator_address: Some(CREATOR.to_string()),
        }
    }

    fn update(title: &str, description: &str) -> UpdateTopicRequest {
        UpdateTopicRequest {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            creator_address: Some(CREATOR.to_string()),
        }
    }

    #[test]
    fn title_boundary_is_fifty_characters() {
        assert!(validate_create(create(&"a".repeat(50), "d")).is_ok());

        let err = validate_create(create(&"a".repeat(51), "d")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Title must be 50 characters or less");

        assert!(validate_update(update(&"a".repeat(50), "d")).is_ok());

        let err = validate_update(update(&"a".repeat(51), "d")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Title must be 50 characters or less");
    }

    #[test]
    fn description_boundary_is_155_characters() {
        assert!(validate_create(create("t", &"d".repeat(155))).is_ok());
        assert!(validate_update(update("t", &"d".repeat(155))).is_ok());

        let err = validate_create(create("t", &"d".repeat(156))).unwrap_err();
        assert_eq!(err.message, "Description must be 155 characters or less");

        let err = validate_update(update("t", &"d".repeat(156))).unwrap_err();
        assert_eq!(err.message, "Description must be 155 characters or less");
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 50 three-byte characters
        assert!(validate_create(create(&"€".repeat(50), "d")).is_ok());
    }

    #[test]
    fn create_requires_every_field() {
        let mut request = create("t", "d");
        request.creator_address = None;
        let err = validate_create(request).unwrap_err();
        assert_eq!(
            err.message,
            "Title, description, and creator address are required"
        );

        let err = validate_create(create("", "d")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn update_checks_creator_before_fields() {
        let request = UpdateTopicRequest {
            title: None,
            description: None,
            creator_address: None,
        };
        let err = validate_update(request).unwrap_err();
        assert_eq!(err.message, "Creator address is required");

        let err = validate_update(update("t", "")).unwrap_err();
        assert_eq!(err.message, "Title and description are required");
    }

    #[test]
    fn non_numeric_id_is_not_found() {
        assert_eq!(parse_topic_id("17").unwrap(), 17);
        assert_eq!(
            parse_topic_id("abc").unwrap_err().status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            parse_topic_id("-1").unwrap_err().status,
            StatusCode::NOT_FOUND
        );
    }
}
