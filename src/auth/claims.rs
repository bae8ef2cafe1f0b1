// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by an access token.
///
/// Signed with HS256. `iat`, `exp` and the optional `nbf` are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    pub email: String,
    pub username: String,
    /// Device the token was issued to
    pub device_id: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

/// Authenticated user extracted from a verified token.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub device_id: String,
    /// Token expiration timestamp (Unix seconds)
    pub expires_at: i64,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            username: claims.username,
            device_id: claims.device_id,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claims_use_camel_case_keys() {
        let claims = TokenClaims {
            user_id: "u-1".to_string(),
            email: "a@x.com".to_string(),
            username: "abc".to_string(),
            device_id: "d-1".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_604_800,
            nbf: None,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": "u-1",
                "email": "a@x.com",
                "username": "abc",
                "deviceId": "d-1",
                "iat": 1_700_000_000,
                "exp": 1_700_604_800
            })
        );
    }

    #[test]
    fn authenticated_user_from_claims() {
        let claims: TokenClaims = serde_json::from_value(json!({
            "userId": "u-1",
            "email": "a@x.com",
            "username": "abc",
            "deviceId": "d-1",
            "iat": 1,
            "exp": 2
        }))
        .unwrap();

        let user = AuthenticatedUser::from(claims);
        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.device_id, "d-1");
        assert_eq!(user.expires_at, 2);
    }
}
