// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Classified API errors.
//!
//! Every failure in the service is one of two kinds:
//!
//! - **user fault**: the caller did something a retry will never fix
//!   (bad/missing/expired token, malformed request, access to someone
//!   else's resource). Rendered as `{time, userMessage}`.
//! - **server fault**: the service could not complete the check (identity
//!   provider or storage unavailable, misconfigured realm key). Rendered as
//!   `{errorId, time, userMessage}`; the full cause is logged keyed by the
//!   generated `errorId` and never reaches the wire.
//!
//! Classification is decided once at the point of failure. Wrapping with
//! additional context is fine; reclassifying while bubbling up is not.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    User,
    Server,
}

#[derive(Debug)]
pub struct ApiError {
    fault: Fault,
    /// Explicit status override. Only meaningful for user faults; a user
    /// fault without one renders as a generic 400.
    status: Option<StatusCode>,
    message: String,
}

/// Body returned for user faults.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserErrorBody {
    /// Time the error was rendered (UTC).
    pub time: DateTime<Utc>,
    /// Message safe to show to the caller.
    #[serde(rename = "userMessage")]
    pub user_message: String,
}

/// Body returned for server faults. The underlying cause is logged under
/// `error_id` and deliberately left out of the payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServerErrorBody {
    /// Opaque tracking code to quote when reporting the problem.
    #[serde(rename = "errorId")]
    pub error_id: String,
    /// Time the error was rendered (UTC).
    pub time: DateTime<Utc>,
    /// Generic message safe to show to the caller.
    #[serde(rename = "userMessage")]
    pub user_message: String,
}

impl ApiError {
    /// A failure on our side. Always renders as 500 with a tracking code.
    pub fn server(message: impl Into<String>) -> Self {
        Self {
            fault: Fault::Server,
            status: None,
            message: message.into(),
        }
    }

    /// A caller mistake with no specific status. Renders as a generic 400.
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            fault: Fault::User,
            status: None,
            message: message.into(),
        }
    }

    /// A caller mistake with an explicit status; `message` is shown to the
    /// caller verbatim.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            fault: Fault::User,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn is_server_fault(&self) -> bool {
        self.fault == Fault::Server
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Prepend context to the message, keeping the classification.
    pub fn context(mut self, context: &str) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

/// Generate a tracking code: uppercase hex of the Unix timestamp plus four
/// random characters. Short enough to read over the phone, unique enough to
/// grep a log for.
pub fn tracking_code() -> String {
    let timestamp = Utc::now().timestamp();
    let entropy = Uuid::new_v4().simple().to_string();
    format!("{:X}{}", timestamp, entropy[..4].to_uppercase())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.fault {
            Fault::Server => {
                let error_id = tracking_code();
                error!(%error_id, cause = %self.message, "request failed with a server fault");

                let body = ServerErrorBody {
                    error_id,
                    time: Utc::now(),
                    user_message: "Internal server error".to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            Fault::User => {
                let (status, user_message) = match self.status {
                    Some(status) => (status, self.message),
                    // No explicit status: don't echo internal detail back.
                    None => (StatusCode::BAD_REQUEST, "Malformed request".to_string()),
                };

                let body = UserErrorBody {
                    time: Utc::now(),
                    user_message,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
