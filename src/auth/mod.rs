// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for the account and asset API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with identity and password
//! 2. Server records the device, signs an HS256 token and stores a session
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. The middleware verifies signature, `exp` and `nbf` and attaches an
//!    [`AuthenticatedUser`] (user ID plus device ID) to the request
//!
//! ## Security
//!
//! - Passwords are stored as bcrypt hashes only
//! - Verification is stateless; logging out removes the device's sessions
//!   and marks the device inactive but does not revoke issued tokens
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod device;
pub mod error;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use device::extract_device_name;
pub use error::AuthError;
pub use extractor::Auth;
pub use jwt::{IssueError, IssuedToken, TokenService};
pub use middleware::require_auth;
