// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::extract::{AppJson, ClientIp, UserAgent};
use crate::{
    auth::Auth,
    error::ApiError,
    models::{LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest},
    response::ApiResponse,
    services::auth::USER_NOT_FOUND,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = ApiResponse<PublicUser>),
        (status = 409, description = "Email or username already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PublicUser>>), ApiError> {
    let user = state.auth.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PublicUser::from(user), "Registration success")),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Unknown identity, wrong password or inactive account"),
        (status = 403, description = "Active device limit reached")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    UserAgent(user_agent): UserAgent,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let outcome = state.auth.login(request, &user_agent, &ip_address).await?;
    let response = LoginResponse {
        access_token: outcome.access_token,
        user: PublicUser::from(outcome.user),
    };
    Ok(Json(ApiResponse::success(response, "Login success")))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Device logged out", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Device not found"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let result = state.auth.logout(&user.user_id, &user.device_id).await?;
    Ok(Json(ApiResponse::success(result, "Logout success")))
}

#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<PublicUser>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let stored = state
        .auth
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
    Ok(Json(ApiResponse::success(
        PublicUser::from(stored),
        "Get profile success",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use chrono::Utc;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".to_string(),
            username: "abc".to_string(),
            password: "Abcdef1!".to_string(),
            name: "A".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_duplicate_conflicts() {
        let (state, _temp_dir) = AppState::for_tests();

        let (status, Json(body)) = register(State(state.clone()), AppJson(register_request()))
            .await
            .expect("registration succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "Registration success");
        assert_eq!(body.data.email, "a@x.com");

        let err = register(State(state), AppJson(register_request()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "Email sudah terdaftar");
    }

    #[tokio::test]
    async fn profile_of_vanished_user_is_not_found() {
        let (state, _temp_dir) = AppState::for_tests();
        let user = AuthenticatedUser {
            user_id: "ghost".to_string(),
            email: "g@x.com".to_string(),
            username: "ghost".to_string(),
            device_id: "d-1".to_string(),
            expires_at: Utc::now().timestamp() + 60,
        };

        let err = profile(State(state), Auth(user)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "User tidak ditemukan");
    }
}
