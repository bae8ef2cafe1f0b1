// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for OpenAPI documentation; JSON field names are camelCase.
//!
//! Requests are only shape-checked by deserialization. Missing or mistyped
//! fields are rejected, but formats (email syntax, password rules) are not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{Device, StoredUser};

// =============================================================================
// Auth Models
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "abc")]
    pub username: String,
    #[schema(example = "Abcdef1!")]
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email (anything containing `@`) or username
    pub identity: String,
    pub password: String,
}

/// User as exposed over the API; never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub is_active: bool,
    pub devices: Vec<Device>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredUser> for PublicUser {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            name: user.name,
            is_active: user.is_active,
            devices: user.devices,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Asset Models
// =============================================================================

/// Asset registration request.
///
/// `wide` and `dateAggrement` are accepted as aliases of `area` and
/// `agreementDate`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub document: Option<String>,
    pub village: Option<String>,
    pub subdistrict: Option<String>,
    /// Land area
    #[serde(alias = "wide")]
    pub area: Option<f64>,
    #[serde(alias = "dateAggrement")]
    pub agreement_date: Option<DateTime<Utc>>,
    pub before_use: Option<String>,
    pub after_use: Option<String>,
    pub information: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetResponse {
    pub message: String,
    pub asset_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn public_user_drops_password() {
        let stored = StoredUser {
            id: "u-1".to_string(),
            email: "a@x.com".to_string(),
            username: "abc".to_string(),
            password: "$2b$04$secret".to_string(),
            name: "A".to_string(),
            is_active: true,
            devices: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(PublicUser::from(stored)).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["isActive"], true);
        assert_eq!(value["devices"], json!([]));
    }

    #[test]
    fn asset_request_accepts_legacy_names() {
        let request: CreateAssetRequest = serde_json::from_value(json!({
            "name": "Balai Desa",
            "type": "Bangunan",
            "wide": 320.0,
            "dateAggrement": "2024-01-15T00:00:00Z",
            "beforeUse": "Kosong"
        }))
        .unwrap();

        assert_eq!(request.asset_type, "Bangunan");
        assert_eq!(request.area, Some(320.0));
        assert!(request.agreement_date.is_some());
        assert_eq!(request.before_use.as_deref(), Some("Kosong"));
        assert!(request.village.is_none());
    }

    #[test]
    fn asset_request_requires_name_and_type() {
        let result = serde_json::from_value::<CreateAssetRequest>(json!({"name": "X"}));
        assert!(result.is_err());
    }
}
