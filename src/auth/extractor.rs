// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Axum extractor guarding protected endpoints.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user.subject is the verified caller identity
//! }
//! ```
//!
//! A missing or malformed `Authorization` header is rejected before the
//! Authenticator is ever invoked. Server faults from the check propagate as
//! the extractor's rejection and render as 500 with a tracking code.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};

use crate::error::ApiError;
use crate::state::AppState;

use super::authenticator::{AuthDecision, AuthenticatedUser};

/// Extractor for authenticated callers; the request guard in front of every
/// protected endpoint.
#[derive(Debug)]
pub struct Auth(pub AuthenticatedUser);

fn no_token() -> ApiError {
    ApiError::with_status(StatusCode::UNAUTHORIZED, "No token provided")
}

impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(no_token)?
            .to_str()
            .map_err(|_| no_token())?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(no_token)?;

        match state.authenticator.check_token(token).await? {
            AuthDecision::Allowed(user) => Ok(Auth(user)),
            AuthDecision::Denied => Err(ApiError::with_status(
                StatusCode::UNAUTHORIZED,
                "Expired or invalid token",
            )),
        }
    }
}
