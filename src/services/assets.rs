// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset registration.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::{CreateAssetRequest, CreateAssetResponse},
    storage::{AssetRepository, DocumentDatabase, StoredAsset},
};

pub const ASSET_CREATED: &str = "Asset berhasil ditambahkan";
const CREATE_ASSET_FAILED: &str = "Gagal menambahkan Aset";

#[derive(Clone)]
pub struct AssetService {
    db: Arc<DocumentDatabase>,
}

impl AssetService {
    pub fn new(db: Arc<DocumentDatabase>) -> Self {
        Self { db }
    }

    /// Persist a new asset under a generated ID. Optional fields are stored
    /// as given.
    pub async fn create(&self, input: CreateAssetRequest) -> Result<CreateAssetResponse, ServiceError> {
        let now = Utc::now();
        let asset = StoredAsset {
            id: Uuid::new_v4().to_string(),
            asset_type: input.asset_type,
            name: input.name,
            document: input.document,
            village: input.village,
            subdistrict: input.subdistrict,
            area: input.area,
            agreement_date: input.agreement_date,
            before_use: input.before_use,
            after_use: input.after_use,
            information: input.information,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let stored = AssetRepository::new(&self.db)
            .create(&asset)
            .map_err(|e| ServiceError::from(e).or_bad_request("Asset creation failed", CREATE_ASSET_FAILED))?;

        info!(asset_id = %stored.id, asset_type = %stored.asset_type, "Asset created");
        Ok(CreateAssetResponse {
            message: ASSET_CREATED.to_string(),
            asset_id: stored.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (AssetService, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(DocumentDatabase::open(&dir.path().join("assets.redb")).unwrap());
        (AssetService::new(db), dir)
    }

    fn request(name: &str) -> CreateAssetRequest {
        CreateAssetRequest {
            name: name.to_string(),
            asset_type: "Tanah".to_string(),
            document: Some("SHM-001".to_string()),
            village: None,
            subdistrict: None,
            area: Some(500.0),
            agreement_date: None,
            before_use: None,
            after_use: None,
            information: None,
        }
    }

    #[tokio::test]
    async fn create_persists_asset_with_timestamps() {
        let (assets, _dir) = service();

        let response = assets.create(request("Sawah Desa")).await.unwrap();
        assert_eq!(response.message, ASSET_CREATED);

        let stored = AssetRepository::new(&assets.db)
            .get(&response.asset_id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "Sawah Desa");
        assert_eq!(stored.document.as_deref(), Some("SHM-001"));
        assert_eq!(stored.area, Some(500.0));
        assert!(stored.updated_at >= stored.created_at);
        assert!(stored.deleted_at.is_none());
    }

    #[tokio::test]
    async fn each_asset_gets_its_own_id() {
        let (assets, _dir) = service();

        let first = assets.create(request("A")).await.unwrap();
        let second = assets.create(request("A")).await.unwrap();
        assert_ne!(first.asset_id, second.asset_id);
    }
}
