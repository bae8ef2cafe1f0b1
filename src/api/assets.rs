// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::extract::AppJson;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateAssetRequest, CreateAssetResponse},
    response::ApiResponse,
    services::assets::ASSET_CREATED,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/asset",
    request_body = CreateAssetRequest,
    tag = "Assets",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Asset registered", body = ApiResponse<CreateAssetResponse>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    AppJson(request): AppJson<CreateAssetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateAssetResponse>>), ApiError> {
    tracing::debug!(user_id = %user.user_id, "Registering asset");
    let created = state.assets.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created, ASSET_CREATED)),
    ))
}
