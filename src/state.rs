// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::TokenService,
    config::AuthSettings,
    services::{AssetService, AuthService},
    storage::DocumentDatabase,
};

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DocumentDatabase>,
    pub tokens: Arc<TokenService>,
    pub auth: AuthService,
    pub assets: AssetService,
}

impl AppState {
    pub fn new(db: DocumentDatabase, settings: AuthSettings) -> Self {
        let db = Arc::new(db);
        let tokens = Arc::new(TokenService::new(&settings.jwt_secret, settings.token_expiry));

        Self {
            auth: AuthService::new(db.clone(), tokens.clone(), settings),
            assets: AssetService::new(db.clone()),
            db,
            tokens,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State over a throwaway database with a low bcrypt cost.
    pub fn for_tests() -> (Self, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let db = DocumentDatabase::open(&temp_dir.path().join("test.redb"))
            .expect("Failed to open database");
        let settings = AuthSettings {
            jwt_secret: "test-secret".to_string(),
            bcrypt_cost: 4,
            ..AuthSettings::default()
        };
        (Self::new(db, settings), temp_dir)
    }
}
