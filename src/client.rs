// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed HTTP client for the topic API.
//!
//! Used by front ends that hold a wallet session: the connected address is
//! passed as the claimed creator on every mutation.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::{
    CreateTopicRequest, DeleteTopicRequest, DeleteTopicResponse, Topic, TopicListResponse,
    TopicResponse, UpdateTopicRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Topic API request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status and an error body.
    #[error("Topic API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Topic API response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct TopicClient {
    base_url: String,
    http: Client,
}

impl TopicClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Request(format!("invalid base URL {base_url}: {e}")))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// All topics, newest first.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, ClientError> {
        let response = self
            .http
            .get(self.url("/topics"))
            .send()
            .await
            .map_err(|e| ClientError::Request(format!("GET /topics failed: {e}")))?;
        let body: TopicListResponse = decode(response).await?;
        Ok(body.topics)
    }

    pub async fn get_topic(&self, id: u64) -> Result<Topic, ClientError> {
        let path = format!("/topics/{id}");
        let response = self
            .http
            .get(self.url(&path))
            .send()
            .await
            .map_err(|e| ClientError::Request(format!("GET {path} failed: {e}")))?;
        let body: TopicResponse = decode(response).await?;
        Ok(body.topic)
    }

    pub async fn create_topic(
        &self,
        title: &str,
        description: &str,
        creator_address: &str,
    ) -> Result<Topic, ClientError> {
        let request = CreateTopicRequest {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            creator_address: Some(creator_address.to_string()),
        };
        let body: TopicResponse = self.send_json(reqwest::Method::POST, "/topics", &request).await?;
        Ok(body.topic)
    }

    pub async fn update_topic(
        &self,
        id: u64,
        title: &str,
        description: &str,
        creator_address: &str,
    ) -> Result<Topic, ClientError> {
        let request = UpdateTopicRequest {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            creator_address: Some(creator_address.to_string()),
        };
        let path = format!("/topics/{id}");
        let body: TopicResponse = self.send_json(reqwest::Method::PUT, &path, &request).await?;
        Ok(body.topic)
    }

    pub async fn delete_topic(&self, id: u64, creator_address: &str) -> Result<(), ClientError> {
        let request = DeleteTopicRequest {
            creator_address: Some(creator_address.to_string()),
        };
        let path = format!("/topics/{id}");
        let body: DeleteTopicResponse =
            self.send_json(reqwest::Method::DELETE, &path, &request).await?;
        if body.success {
            Ok(())
        } else {
            Err(ClientError::InvalidResponse(format!(
                "DELETE {path} reported failure"
            )))
        }
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .request(method.clone(), self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Request(format!("{method} {path} failed: {e}")))?;
        decode(response).await
    }
}

/// Decode a success body, or turn the service's `{"error": ..}` body into
/// [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::router, state::AppState, storage::TopicDatabase};
    use tempfile::TempDir;

    const ALICE: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    async fn spawn_server(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn client_with_database() -> (TopicClient, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = TopicDatabase::open(&dir.path().join("topics.redb")).unwrap();
        let url = spawn_server(AppState::new(db)).await;
        (TopicClient::new(url).unwrap(), dir)
    }

    #[tokio::test]
    async fn full_topic_lifecycle() {
        let (client, _dir) = client_with_database().await;

        let first = client.create_topic("First", "one", ALICE).await.unwrap();
        let second = client.create_topic("Second", "two", ALICE).await.unwrap();

        let listed = client.list_topics().await.unwrap();
        assert_eq!(listed, vec![second.clone(), first.clone()]);

        let fetched = client.get_topic(first.id).await.unwrap();
        assert_eq!(fetched, first);

        let updated = client
            .update_topic(first.id, "Renamed", "edited", &ALICE.to_lowercase())
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.creator_address, ALICE);

        client.delete_topic(first.id, ALICE).await.unwrap();
        assert_eq!(client.list_topics().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_message() {
        let (client, _dir) = client_with_database().await;
        let topic = client.create_topic("Mine", "desc", ALICE).await.unwrap();

        match client.delete_topic(topic.id, BOB).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Only the creator can delete this topic");
            }
            other => panic!("expected 403, got {other:?}"),
        }

        match client.get_topic(topic.id + 100).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Topic not found");
            }
            other => panic!("expected 404, got {other:?}"),
        }

        match client.create_topic(&"x".repeat(51), "desc", ALICE).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Title must be 50 characters or less");
            }
            other => panic!("expected 400, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_database_is_reported() {
        let url = spawn_server(AppState::without_database()).await;
        let client = TopicClient::new(url).unwrap();

        match client.list_topics().await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database not available");
            }
            other => panic!("expected 500, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unparsable_base_url() {
        assert!(matches!(
            TopicClient::new("not a url"),
            Err(ClientError::Request(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = TopicClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.url("/topics"), "http://localhost:8080/topics");
    }
}
