// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset repository.
//!
//! Assets are registration records for land and buildings. Each asset is a
//! document in the `assets` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::database::{from_document, to_document, DocumentDatabase, StoreResult};

pub const ASSETS_COLLECTION: &str = "assets";

/// Asset as stored in the `assets` collection.
///
/// `deleted_at` is part of the record shape but nothing sets it yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdistrict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Repository for asset documents.
pub struct AssetRepository<'a> {
    db: &'a DocumentDatabase,
}

impl<'a> AssetRepository<'a> {
    pub fn new(db: &'a DocumentDatabase) -> Self {
        Self { db }
    }

    /// Create a new asset under its own ID.
    pub fn create(&self, asset: &StoredAsset) -> StoreResult<StoredAsset> {
        let document = to_document(asset)?;
        let stored = self
            .db
            .create(ASSETS_COLLECTION, document, Some(&asset.id))?;
        from_document(stored)
    }

    /// Get an asset by ID.
    pub fn get(&self, asset_id: &str) -> StoreResult<Option<StoredAsset>> {
        self.db
            .get(ASSETS_COLLECTION, asset_id)?
            .map(from_document)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_and_get_asset_keeps_optional_fields() {
        let dir = TempDir::new().unwrap();
        let db = DocumentDatabase::open(&dir.path().join("assets.redb")).unwrap();
        let repo = AssetRepository::new(&db);

        let asset = StoredAsset {
            id: "a-1".to_string(),
            asset_type: "Tanah".to_string(),
            name: "Lapangan Desa".to_string(),
            document: None,
            village: Some("Sukamaju".to_string()),
            subdistrict: Some("Cibeunying".to_string()),
            area: Some(1250.5),
            agreement_date: None,
            before_use: None,
            after_use: None,
            information: Some("Dipakai untuk kegiatan warga".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        repo.create(&asset).unwrap();

        let loaded = repo.get("a-1").unwrap().unwrap();
        assert_eq!(loaded.asset_type, "Tanah");
        assert_eq!(loaded.village.as_deref(), Some("Sukamaju"));
        assert_eq!(loaded.area, Some(1250.5));
        assert!(loaded.document.is_none());
        assert!(loaded.deleted_at.is_none());

        let raw = db.get(ASSETS_COLLECTION, "a-1").unwrap().unwrap();
        assert_eq!(raw["type"], "Tanah");
        assert!(!raw.contains_key("document"));
    }

    #[test]
    fn get_unknown_asset_is_none() {
        let dir = TempDir::new().unwrap();
        let db = DocumentDatabase::open(&dir.path().join("assets.redb")).unwrap();
        assert!(AssetRepository::new(&db).get("missing").unwrap().is_none());
    }
}
