// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::error::ApiError;
use crate::storage::TopicDatabase;

#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when the database could not be opened at startup. The server
    /// still runs; every topic request then fails with 500.
    pub topics: Option<Arc<TopicDatabase>>,
}

impl AppState {
    pub fn new(topics: TopicDatabase) -> Self {
        Self {
            topics: Some(Arc::new(topics)),
        }
    }

    /// State with no database attached.
    pub fn without_database() -> Self {
        Self::default()
    }

    pub fn topics(&self) -> Result<&TopicDatabase, ApiError> {
        self.topics
            .as_deref()
            .ok_or_else(ApiError::database_unavailable)
    }
}
