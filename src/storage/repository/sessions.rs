// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session repository.
//!
//! One session row is written per successful login. Rows are removed on
//! logout for the (user, device) pair; nothing sweeps expired rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::database::{from_document, to_document, DocumentDatabase, StoreResult};

pub const SESSIONS_COLLECTION: &str = "sessions";

/// Session as stored in the `sessions` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Assigned by the store on insert
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub device_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for session documents.
pub struct SessionRepository<'a> {
    db: &'a DocumentDatabase,
}

impl<'a> SessionRepository<'a> {
    pub fn new(db: &'a DocumentDatabase) -> Self {
        Self { db }
    }

    /// Persist a new session under a generated ID.
    pub fn create(&self, session: &StoredSession) -> StoreResult<StoredSession> {
        let mut document = to_document(session)?;
        document.remove("id");
        let stored = self.db.create(SESSIONS_COLLECTION, document, None)?;
        from_document(stored)
    }

    /// All sessions of a user, across devices.
    pub fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<StoredSession>> {
        self.db
            .query(
                SESSIONS_COLLECTION,
                "userId",
                &Value::String(user_id.to_string()),
                None,
            )?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Sessions of a user on one device.
    pub fn list_by_device(&self, user_id: &str, device_id: &str) -> StoreResult<Vec<StoredSession>> {
        Ok(self
            .list_by_user(user_id)?
            .into_iter()
            .filter(|session| session.device_id == device_id)
            .collect())
    }

    /// Delete every session of a user on one device. Returns how many rows
    /// were removed; zero is not an error.
    pub fn delete_by_device(&self, user_id: &str, device_id: &str) -> StoreResult<usize> {
        let mut deleted = 0;
        for session in self.list_by_device(user_id, device_id)? {
            if self.db.delete(SESSIONS_COLLECTION, &session.id)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
