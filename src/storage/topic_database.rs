// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded topic database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `topics`: id → serialized Topic (JSON bytes)
//! - `topic_time_index`: composite key (!created_at_micros|!id) → id
//! - `topic_meta`: key → u64 (id sequence)
//!
//! Update and delete read, check the creator, and write inside a single write
//! transaction. redb admits one writer at a time, so no other mutation can land
//! between the ownership check and the write.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};

use super::ownership::OwnershipEnforcer;
use crate::models::{NewTopic, Topic, TopicEdit};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: id → serialized Topic (JSON bytes).
const TOPICS: TableDefinition<u64, &[u8]> = TableDefinition::new("topics");

/// Index: `!created_at_micros_be | !id_be` → id, for newest-first forward scans.
const TOPIC_TIME_INDEX: TableDefinition<&[u8], u64> = TableDefinition::new("topic_time_index");

/// Metadata: key → u64.
const TOPIC_META: TableDefinition<&str, u64> = TableDefinition::new("topic_meta");

const NEXT_ID_KEY: &str = "next_topic_id";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TopicDbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("topic {0} not found")]
    NotFound(u64),

    #[error("topic {0} belongs to another creator")]
    NotCreator(u64),
}

pub type TopicDbResult<T> = Result<T, TopicDbError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build the time index key for a topic.
///
/// Both parts are bit-inverted so a forward scan yields the newest topic
/// first and, within the same microsecond, the higher id first.
fn make_index_key(created_at_micros: i64, id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&(!(created_at_micros as u64)).to_be_bytes());
    key[8..].copy_from_slice(&(!id).to_be_bytes());
    key
}

fn index_key_for(topic: &Topic) -> [u8; 16] {
    make_index_key(topic.created_at.timestamp_micros(), topic.id)
}

// =============================================================================
// TopicDatabase
// =============================================================================

/// Embedded ACID topic store.
pub struct TopicDatabase {
    db: Database,
}

impl TopicDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> TopicDbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TOPICS)?;
            let _ = write_txn.open_table(TOPIC_TIME_INDEX)?;
            let _ = write_txn.open_table(TOPIC_META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// All topics, newest first.
    pub fn list(&self) -> TopicDbResult<Vec<Topic>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TOPIC_TIME_INDEX)?;
        let topics = read_txn.open_table(TOPICS)?;

        let mut results = Vec::new();
        for entry in index.iter()? {
            let (_, id) = entry?;
            if let Some(value) = topics.get(id.value())? {
                results.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(results)
    }

    /// Insert a topic, assigning its id and creation time.
    pub fn create(&self, new_topic: NewTopic) -> TopicDbResult<Topic> {
        let write_txn = self.db.begin_write()?;
        let topic = {
            let mut meta = write_txn.open_table(TOPIC_META)?;
            let id = meta.get(NEXT_ID_KEY)?.map(|v| v.value()).unwrap_or(1);
            meta.insert(NEXT_ID_KEY, id + 1)?;

            let topic = Topic {
                id,
                title: new_topic.title,
                description: new_topic.description,
                creator_address: new_topic.creator_address,
                created_at: Utc::now(),
            };

            let json = serde_json::to_vec(&topic)?;
            let mut table = write_txn.open_table(TOPICS)?;
            table.insert(id, json.as_slice())?;

            let mut index = write_txn.open_table(TOPIC_TIME_INDEX)?;
            index.insert(index_key_for(&topic).as_slice(), id)?;

            topic
        };
        write_txn.commit()?;
        Ok(topic)
    }

    /// Look up a single topic.
    pub fn get(&self, id: u64) -> TopicDbResult<Option<Topic>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TOPICS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Replace title and description if `edit.creator_address` created the topic.
    ///
    /// # Errors
    /// `NotFound` if no topic has this id, `NotCreator` if it exists but
    /// belongs to another address.
    pub fn update_owned(&self, id: u64, edit: TopicEdit) -> TopicDbResult<Topic> {
        let write_txn = self.db.begin_write()?;
        let topic = {
            let mut table = write_txn.open_table(TOPICS)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = table.get(id)?.ok_or(TopicDbError::NotFound(id))?;
                existing.value().to_vec()
            };

            let mut topic: Topic = serde_json::from_slice(&existing_bytes)?;
            if !topic.is_created_by(&edit.creator_address) {
                return Err(TopicDbError::NotCreator(id));
            }
            topic.title = edit.title;
            topic.description = edit.description;

            let json = serde_json::to_vec(&topic)?;
            table.insert(id, json.as_slice())?;
            topic
        };
        write_txn.commit()?;
        Ok(topic)
    }

    /// Remove a topic if `creator_address` created it.
    ///
    /// # Errors
    /// Same as [`TopicDatabase::update_owned`].
    pub fn delete_owned(&self, id: u64, creator_address: &str) -> TopicDbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TOPICS)?;

            let existing_bytes = {
                let existing = table.get(id)?.ok_or(TopicDbError::NotFound(id))?;
                existing.value().to_vec()
            };

            let topic: Topic = serde_json::from_slice(&existing_bytes)?;
            if !topic.is_created_by(creator_address) {
                return Err(TopicDbError::NotCreator(id));
            }

            table.remove(id)?;
            let mut index = write_txn.open_table(TOPIC_TIME_INDEX)?;
            index.remove(index_key_for(&topic).as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Number of stored topics.
    pub fn count(&self) -> TopicDbResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TOPICS)?;
        Ok(table.len()?)
    }
}
