// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset Registry Server - accounts with multi-device sessions and asset
//! registration records.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `app` - Process-wide application bootstrap
//! - `auth` - Bearer token authentication, password hashing, device naming
//! - `services` - Registration, login/logout and asset business logic
//! - `storage` - Embedded document database (redb) and typed repositories

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod response;
pub mod services;
pub mod state;
pub mod storage;
