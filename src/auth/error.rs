// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind;

use crate::response::ApiResponse;

/// Bearer token rejection.
///
/// Every variant answers 401 with its own message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("No Authorization header found")]
    MissingAuthHeader,
    /// Header is not `Bearer <token>` or not valid ASCII
    #[error("Format token invalid")]
    InvalidAuthHeader,
    #[error("Token is empty")]
    EmptyToken,
    #[error("Token is expired")]
    TokenExpired,
    /// Malformed token or bad signature
    #[error("Invalid token")]
    InvalidToken,
    /// `nbf` lies in the future
    #[error("Token not active")]
    TokenNotActive,
    #[error("Token verification failed")]
    VerificationFailed,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::EmptyToken => "empty_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenNotActive => "token_not_active",
            AuthError::VerificationFailed => "verification_failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::ImmatureSignature => AuthError::TokenNotActive,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AuthError::InvalidToken,
            _ => AuthError::VerificationFailed,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(error_code = self.error_code(), "Rejected bearer token");
        (self.status_code(), Json(ApiResponse::error(self.to_string()))).into_response()
    }
}
