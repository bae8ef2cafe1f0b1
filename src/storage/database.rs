// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Layout
//!
//! Every collection is its own redb table mapping `id → JSON bytes`.
//! A document is a JSON object that always carries its own `id`,
//! `createdAt` and `updatedAt` fields.
//!
//! Tables are created lazily by the first write into a collection; reads
//! against a collection that has never been written behave as empty.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
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

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("duplicate value for `{field}` in {collection}")]
    Duplicate { collection: String, field: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Helpers
// =============================================================================

fn collection_table(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

fn timestamp_now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn decode(bytes: &[u8]) -> StoreResult<Document> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Serialize a typed record into a document.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Deserialize a document into a typed record.
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

// =============================================================================
// DocumentDatabase
// =============================================================================

/// Collection-oriented document store.
///
/// All writes go through redb write transactions, which redb serializes;
/// [`DocumentDatabase::modify`] and [`DocumentDatabase::insert_unique`]
/// rely on this to make their read-then-write sequences atomic.
pub struct DocumentDatabase {
    db: Database,
}

impl DocumentDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Ok(Self { db })
    }

    /// Verify the database can open a read transaction.
    pub fn health_check(&self) -> StoreResult<()> {
        let _read_txn = self.db.begin_read()?;
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store a new document, stamping `id`, `createdAt` and `updatedAt`.
    ///
    /// A fresh UUID is used when `id` is `None`. Returns the stored document.
    pub fn create(
        &self,
        collection: &str,
        data: Document,
        id: Option<&str>,
    ) -> StoreResult<Document> {
        self.insert_unique(collection, data, id, &[])
    }

    /// Like [`create`](Self::create), but rejects the insert when another
    /// document in the collection holds an equal value for any of
    /// `unique_fields`. The check and the insert share one write transaction.
    pub fn insert_unique(
        &self,
        collection: &str,
        mut data: Document,
        id: Option<&str>,
        unique_fields: &[&str],
    ) -> StoreResult<Document> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let now = timestamp_now();
        data.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        data.insert(CREATED_AT_FIELD.to_string(), now.clone());
        data.insert(UPDATED_AT_FIELD.to_string(), now);

        let json = serde_json::to_vec(&data)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection_table(collection))?;

            if table.get(id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("{collection}/{id}")));
            }

            if !unique_fields.is_empty() {
                for entry in table.iter()? {
                    let (_, value) = entry?;
                    let existing = decode(value.value())?;
                    for field in unique_fields {
                        let candidate = data.get(*field);
                        if candidate.is_some() && existing.get(*field) == candidate {
                            return Err(StoreError::Duplicate {
                                collection: collection.to_string(),
                                field: field.to_string(),
                            });
                        }
                    }
                }
            }

            table.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!(collection, id = %id, "Document created");
        Ok(data)
    }

    /// Merge `patch` into an existing document and stamp `updatedAt`.
    ///
    /// The `id` and `createdAt` fields cannot be overwritten.
    pub fn update(&self, collection: &str, id: &str, patch: Document) -> StoreResult<Document> {
        let updated = self.modify(collection, id, |document: &mut Document| {
            for (key, value) in patch {
                if key == ID_FIELD || key == CREATED_AT_FIELD {
                    continue;
                }
                document.insert(key, value);
            }
            Ok::<_, StoreError>(document.clone())
        })?;

        updated.ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))
    }

    /// Atomic read-modify-write of a single document.
    ///
    /// `f` runs inside a write transaction. If it returns `Ok`, the mutated
    /// document is stamped with `updatedAt` and committed; if it returns
    /// `Err`, the transaction is dropped and nothing is written.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    pub fn modify<T, E, F>(&self, collection: &str, id: &str, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let write_txn = self.db.begin_write().map_err(StoreError::from)?;
        let output = {
            let mut table = write_txn
                .open_table(collection_table(collection))
                .map_err(StoreError::from)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = match table.get(id).map_err(StoreError::from)? {
                Some(value) => value.value().to_vec(),
                None => return Ok(None),
            };

            let mut document = decode(&existing_bytes)?;
            let output = f(&mut document)?;

            document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
            document.insert(UPDATED_AT_FIELD.to_string(), timestamp_now());

            let json = serde_json::to_vec(&document).map_err(StoreError::from)?;
            table
                .insert(id, json.as_slice())
                .map_err(StoreError::from)?;
            output
        };
        write_txn.commit().map_err(StoreError::from)?;

        tracing::debug!(collection, id, "Document updated");
        Ok(Some(output))
    }

    /// Delete a document. Returns whether it existed.
    pub fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(collection_table(collection))?;
            let removed = table.remove(id)?;
            removed.is_some()
        };
        write_txn.commit()?;

        if existed {
            tracing::debug!(collection, id, "Document deleted");
        }
        Ok(existed)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Look up a single document by id.
    pub fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(collection_table(collection)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match table.get(id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// List documents in a collection, up to `limit` if given.
    pub fn list(&self, collection: &str, limit: Option<usize>) -> StoreResult<Vec<Document>> {
        self.scan(collection, limit, |_| true)
    }

    /// Equality query on a single field, up to `limit` matches if given.
    pub fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        self.scan(collection, limit, |document| document.get(field) == Some(value))
    }

    fn scan(
        &self,
        collection: &str,
        limit: Option<usize>,
        matches: impl Fn(&Document) -> bool,
    ) -> StoreResult<Vec<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(collection_table(collection)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let limit = limit.unwrap_or(usize::MAX);
        let mut results = Vec::new();
        if limit == 0 {
            return Ok(results);
        }

        for entry in table.iter()? {
            let (_, value) = entry?;
            let document = decode(value.value())?;
            if matches(&document) {
                results.push(document);
                if results.len() >= limit {
                    break;
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn temp_db() -> (DocumentDatabase, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = DocumentDatabase::open(&dir.path().join("documents.redb")).unwrap();
        (db, dir)
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn create_stamps_id_and_timestamps() {
        let (db, _dir) = temp_db();

        let stored = db
            .create("assets", doc(json!({"name": "Balai Desa"})), None)
            .unwrap();

        let id = stored[ID_FIELD].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        assert!(stored.contains_key(CREATED_AT_FIELD));
        assert_eq!(stored[CREATED_AT_FIELD], stored[UPDATED_AT_FIELD]);

        let loaded = db.get("assets", &id).unwrap().unwrap();
        assert_eq!(loaded, stored);
    }

    #[test]
    fn create_with_explicit_id_rejects_existing() {
        let (db, _dir) = temp_db();
        db.create("users", doc(json!({"n": 1})), Some("u-1")).unwrap();

        let result = db.create("users", doc(json!({"n": 2})), Some("u-1"));
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn get_on_unknown_collection_is_none() {
        let (db, _dir) = temp_db();
        assert!(db.get("never-written", "x").unwrap().is_none());
        assert!(db.list("never-written", None).unwrap().is_empty());
    }

    #[test]
    fn update_merges_fields_and_keeps_created_at() {
        let (db, _dir) = temp_db();
        let stored = db
            .create("users", doc(json!({"name": "A", "isActive": true})), Some("u-1"))
            .unwrap();

        let updated = db
            .update(
                "users",
                "u-1",
                doc(json!({"name": "B", "createdAt": "1970-01-01T00:00:00Z", "id": "hijack"})),
            )
            .unwrap();

        assert_eq!(updated["name"], "B");
        assert_eq!(updated["isActive"], true);
        assert_eq!(updated[ID_FIELD], "u-1");
        assert_eq!(updated[CREATED_AT_FIELD], stored[CREATED_AT_FIELD]);
    }

    #[test]
    fn update_missing_document_is_not_found() {
        let (db, _dir) = temp_db();
        let result = db.update("users", "ghost", Document::new());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn modify_error_leaves_document_untouched() {
        let (db, _dir) = temp_db();
        db.create("users", doc(json!({"count": 1})), Some("u-1")).unwrap();

        let result: Result<Option<()>, StoreError> = db.modify("users", "u-1", |document| {
            document.insert("count".into(), json!(2));
            Err(StoreError::NotFound("rejected".into()))
        });
        assert!(result.is_err());

        let loaded = db.get("users", "u-1").unwrap().unwrap();
        assert_eq!(loaded["count"], 1);
    }

    #[test]
    fn modify_missing_document_returns_none() {
        let (db, _dir) = temp_db();
        let result: Option<()> = db
            .modify("users", "ghost", |_| Ok::<_, StoreError>(()))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn query_matches_single_field_and_honours_limit() {
        let (db, _dir) = temp_db();
        for i in 0..4 {
            db.create("sessions", doc(json!({"userId": "u-1", "n": i})), None)
                .unwrap();
        }
        db.create("sessions", doc(json!({"userId": "u-2"})), None)
            .unwrap();

        let all = db.query("sessions", "userId", &json!("u-1"), None).unwrap();
        assert_eq!(all.len(), 4);

        let limited = db
            .query("sessions", "userId", &json!("u-1"), Some(2))
            .unwrap();
        assert_eq!(limited.len(), 2);

        let none = db.query("sessions", "userId", &json!("u-3"), None).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn insert_unique_rejects_duplicate_field() {
        let (db, _dir) = temp_db();
        db.insert_unique(
            "users",
            doc(json!({"email": "a@x.com", "username": "abc"})),
            None,
            &["email", "username"],
        )
        .unwrap();

        let result = db.insert_unique(
            "users",
            doc(json!({"email": "b@x.com", "username": "abc"})),
            None,
            &["email", "username"],
        );
        match result {
            Err(StoreError::Duplicate { field, .. }) => assert_eq!(field, "username"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn delete_reports_existence() {
        let (db, _dir) = temp_db();
        db.create("sessions", Document::new(), Some("s-1")).unwrap();

        assert!(db.delete("sessions", "s-1").unwrap());
        assert!(!db.delete("sessions", "s-1").unwrap());
        assert!(db.get("sessions", "s-1").unwrap().is_none());
    }

    #[test]
    fn health_check_passes_on_open_database() {
        let (db, _dir) = temp_db();
        db.health_check().unwrap();
    }
}
