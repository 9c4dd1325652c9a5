// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Health endpoint. Unauthenticated by design.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Whether the configured realm public key parsed. A misconfigured key
    /// fails every token check, so surface it here before callers do.
    #[serde(rename = "realmKey")]
    pub realm_key: String,
}

/// Health check endpoint handler.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse),
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let key_ok = state.authenticator.key_ok();

    let response = HealthResponse {
        status: if key_ok { "ok" } else { "degraded" }.to_string(),
        realm_key: if key_ok { "ok" } else { "misconfigured" }.to_string(),
    };

    let status = if key_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
