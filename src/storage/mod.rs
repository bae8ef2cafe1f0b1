// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent storage for users, sessions and assets, kept in an embedded
//! redb database file under the data directory.
//!
//! ## Collections
//!
//! ```text
//! users      {id} → user document (devices embedded)
//! sessions   {id} → one row per successful login
//! assets     {id} → asset registration record
//! ```
//!
//! ## Important Notes
//!
//! - Every collection is a redb table of JSON documents
//! - Writes are serialized by redb; read-modify-write goes through
//!   [`DocumentDatabase::modify`] to stay atomic
//! - Storage errors surface unmodified; there is no retry

pub mod database;
pub mod repository;

pub use database::{Document, DocumentDatabase, StoreError, StoreResult};
pub use repository::{
    AssetRepository, Device, SessionRepository, StoredAsset, StoredSession, StoredUser,
    UserRepository,
};
