// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users live in the `users` collection. Each user embeds its ordered list
//! of devices; devices are never stored on their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::super::database::{from_document, to_document, DocumentDatabase, StoreError, StoreResult};

pub const USERS_COLLECTION: &str = "users";

/// One login context (browser or app instance) of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Unique device identifier (UUID)
    pub id: String,
    /// Display name derived from the user-agent
    pub name: String,
    pub user_agent: String,
    pub ip_address: String,
    pub last_login_at: DateTime<Utc>,
    pub is_active: bool,
}

/// User as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    /// Lowercased, unique
    pub email: String,
    /// Lowercased, unique
    pub username: String,
    /// bcrypt hash, never the plaintext
    pub password: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub devices: Vec<Device>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredUser {
    /// Number of devices currently marked active.
    pub fn active_device_count(&self) -> usize {
        self.devices.iter().filter(|device| device.is_active).count()
    }

    pub fn device(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == device_id)
    }
}

/// Repository for user documents.
pub struct UserRepository<'a> {
    db: &'a DocumentDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DocumentDatabase) -> Self {
        Self { db }
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StoreResult<Option<StoredUser>> {
        self.db
            .get(USERS_COLLECTION, user_id)?
            .map(from_document)
            .transpose()
    }

    /// Find a user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        self.find_one("email", &email.to_lowercase())
    }

    /// Find a user by username (case-insensitive).
    pub fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredUser>> {
        self.find_one("username", &username.to_lowercase())
    }

    fn find_one(&self, field: &str, value: &str) -> StoreResult<Option<StoredUser>> {
        self.db
            .query(USERS_COLLECTION, field, &Value::String(value.to_string()), Some(1))?
            .into_iter()
            .next()
            .map(from_document)
            .transpose()
    }

    /// Create a new user.
    ///
    /// Email and username are lowercased before storing, and the insert fails
    /// with [`StoreError::Duplicate`] if either is already taken.
    pub fn create(&self, user: &StoredUser) -> StoreResult<StoredUser> {
        let mut user = user.clone();
        user.email = user.email.to_lowercase();
        user.username = user.username.to_lowercase();

        let document = to_document(&user)?;
        let stored = self.db.insert_unique(
            USERS_COLLECTION,
            document,
            Some(&user.id),
            &["email", "username"],
        )?;
        from_document(stored)
    }

    /// Atomically mutate a user.
    ///
    /// `f` sees the current stored state and runs inside a single write
    /// transaction, so concurrent device updates for the same user cannot
    /// overwrite each other. Returns `Ok(None)` if the user does not exist.
    pub fn modify<T, E, F>(&self, user_id: &str, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut StoredUser) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.db.modify(USERS_COLLECTION, user_id, |document| {
            let mut user: StoredUser = from_document(document.clone())?;
            let output = f(&mut user)?;
            *document = to_document(&user)?;
            Ok(output)
        })
    }
}
