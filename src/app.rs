// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Application Bootstrap
//!
//! [`shared`] builds the application once per process. Concurrent first
//! callers wait on the same initialization; if it fails, the error goes to
//! the caller that ran it and the next caller tries again.

use axum::Router;
use tokio::sync::OnceCell;
use tracing::info;

use crate::{
    api,
    config::{AppConfig, ConfigError},
    state::AppState,
    storage::{DocumentDatabase, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create data directory: {0}")]
    DataDir(#[from] std::io::Error),

    #[error("failed to open database: {0}")]
    Database(#[from] StoreError),
}

/// A fully wired application: configuration plus the router over its state.
pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
    pub router: Router,
}

static APPLICATION: OnceCell<Application> = OnceCell::const_new();

/// Process-wide application, built from the environment on first use.
pub async fn shared() -> Result<&'static Application, StartupError> {
    APPLICATION
        .get_or_try_init(|| async { build_app(AppConfig::from_env()?) })
        .await
}

/// Open storage and wire services and routes for `config`.
pub fn build_app(config: AppConfig) -> Result<Application, StartupError> {
    std::fs::create_dir_all(&config.data_dir)?;

    let database_path = config.database_path();
    let db = DocumentDatabase::open(&database_path)?;
    info!(path = %database_path.display(), "Document database opened");

    let state = AppState::new(db, config.auth.clone());
    let router = api::router(state.clone());

    Ok(Application {
        config,
        state,
        router,
    })
}
