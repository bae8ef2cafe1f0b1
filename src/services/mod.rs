// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Business logic between the HTTP handlers and the repositories.
//!
//! Services return [`crate::error::ServiceError`]. Domain failures pass
//! through; storage and crypto failures are logged and replaced with the
//! operation's localized failure message.

pub mod assets;
pub mod auth;

pub use assets::AssetService;
pub use auth::{AuthService, LoginOutcome};
