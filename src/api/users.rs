// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! User endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;
use crate::store::UserStore;

/// Get the locally mirrored record of the authenticated caller.
///
/// The record is provisioned by the authentication gate itself on first
/// sighting, so a 404 here means the store lost it afterwards.
#[utoipa::path(
    get,
    path = "/v1/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's user record", body = User),
        (status = 401, description = "Missing, expired or invalid token"),
        (status = 404, description = "No local record for the caller"),
    )
)]
pub async fn get_me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let record = state
        .store
        .get_user(&user.subject)
        .await
        .map_err(|e| ApiError::server(e.to_string()).context("unable to retrieve user"))?
        .ok_or_else(|| ApiError::with_status(StatusCode::NOT_FOUND, "No user found"))?;

    Ok(Json(record))
}
