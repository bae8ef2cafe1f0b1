// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document database.
//!
//! Each repository wraps one collection and converts between stored
//! documents and typed records.

pub mod assets;
pub mod sessions;
pub mod users;

pub use assets::{AssetRepository, StoredAsset, ASSETS_COLLECTION};
pub use sessions::{SessionRepository, StoredSession, SESSIONS_COLLECTION};
pub use users::{Device, StoredUser, UserRepository, USERS_COLLECTION};
