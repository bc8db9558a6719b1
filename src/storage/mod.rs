// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Topic Storage
//!
//! Topics persist in an embedded redb database (`DATA_DIR/topics.redb`).
//! Creator checks live in [`ownership`] and are applied by the database
//! inside the same write transaction as the mutation they guard.

pub mod ownership;
pub mod topic_database;

pub use ownership::{addresses_match, OwnedResource, OwnershipEnforcer};
pub use topic_database::{TopicDatabase, TopicDbError, TopicDbResult};
