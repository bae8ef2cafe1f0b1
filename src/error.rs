// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service and HTTP error types.
//!
//! [`ServiceError`] is what the services return. Domain failures (conflict,
//! unauthorized, forbidden, bad request) pass through untouched; anything
//! else is logged and wrapped into a localized bad request at the service
//! boundary via [`ServiceError::or_bad_request`]. [`ApiError`] renders the
//! error envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{response::ApiResponse, storage::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("token issuing error: {0}")]
    Token(#[from] crate::auth::IssueError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServiceError {
    /// Whether this is one of the domain failures callers are meant to see.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ServiceError::Conflict(_)
                | ServiceError::Unauthorized(_)
                | ServiceError::Forbidden(_)
                | ServiceError::BadRequest(_)
        )
    }

    /// Keep domain failures; log anything else with `context` and replace it
    /// with a bad request carrying `message`.
    pub fn or_bad_request(self, context: &str, message: &str) -> Self {
        if self.is_domain() {
            return self;
        }
        tracing::error!(error = %self, "{context}");
        ServiceError::BadRequest(message.to_string())
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Conflict(message) => Self::new(StatusCode::CONFLICT, message),
            ServiceError::Unauthorized(message) => Self::unauthorized(message),
            ServiceError::Forbidden(message) => Self::new(StatusCode::FORBIDDEN, message),
            ServiceError::BadRequest(message) => Self::bad_request(message),
            other => {
                tracing::error!(error = %other, "Unhandled service error");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::error(self.message))).into_response()
    }
}
