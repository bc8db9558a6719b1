// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the topic API. All types derive `Serialize`,
//! `Deserialize`, and `ToSchema` for JSON handling and OpenAPI documentation.
//!
//! Request fields are optional at the serde layer so that a missing field
//! produces the API's own validation message instead of a generic
//! deserialization rejection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 50;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 155;

// =============================================================================
// Topic
// =============================================================================

/// A discussion topic.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Topic {
    /// Identifier assigned by storage.
    pub id: u64,
    /// Title, 1 to 50 characters.
    pub title: String,
    /// Description, 1 to 155 characters.
    pub description: String,
    /// Address of the account that created the topic.
    pub creator_address: String,
    /// Creation time assigned by storage.
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub title: String,
    pub description: String,
    pub creator_address: String,
}

/// Validated input for editing a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEdit {
    pub title: String,
    pub description: String,
    pub creator_address: String,
}

// =============================================================================
// Requests
// =============================================================================

/// Request to create a topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateTopicRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Claimed identity of the caller. Not verified by signature.
    #[serde(default)]
    pub creator_address: Option<String>,
}

/// Request to edit a topic's title and description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTopicRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Must match the stored creator, ignoring case.
    #[serde(default)]
    pub creator_address: Option<String>,
}

/// Request to delete a topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeleteTopicRequest {
    /// Must match the stored creator, ignoring case.
    #[serde(default)]
    pub creator_address: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TopicListResponse {
    /// Topics, newest first.
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TopicResponse {
    pub topic: Topic,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteTopicResponse {
    pub success: bool,
}
