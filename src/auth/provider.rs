// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Identity-provider client.
//!
//! A verified signature only proves the token was once issued; it says
//! nothing about revocation. The reconciliation step therefore asks the
//! provider's user-info endpoint whether the token is still honored, and
//! uses the canonical subject and username from that answer.
//!
//! The error split matters: a 401-class answer means the *token* is bad
//! (caller's problem), anything else means *we* currently cannot decide
//! (server fault). Conflating the two would turn every Keycloak outage into
//! a silent mass logout, or worse, every revoked token into a 500.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Outbound request timeout. A hung identity provider must surface as a
/// server fault, not a hung request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Canonical identity as reported by the provider.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub subject: String,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider no longer honors this token (revoked, unknown subject,
    /// disabled account). The caller's problem.
    #[error("identity provider rejected the token")]
    Unauthorized,
    /// The provider could not be asked (network error, timeout, 5xx). Our
    /// problem; no authorization decision can be made.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// User-info lookup against the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn user_info(&self, raw_token: &str) -> Result<UserInfo, ProviderError>;
}

/// Keycloak-backed provider for a single realm.
#[derive(Clone)]
pub struct KeycloakProvider {
    userinfo_url: String,
    discovery_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UserInfoBody {
    sub: String,
    preferred_username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscoveryBody {
    issuer: String,
}

impl KeycloakProvider {
    pub fn new(server_url: &str, realm: &str) -> Self {
        let base = server_url.trim_end_matches('/');
        Self {
            userinfo_url: format!("{base}/realms/{realm}/protocol/openid-connect/userinfo"),
            discovery_url: format!("{base}/realms/{realm}/.well-known/openid-configuration"),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to create HTTP client"),
        }
    }

    /// Fetch the realm's OpenID discovery document and return its issuer.
    /// Run once at startup to catch a mistyped realm or URL early.
    pub async fn sanity_check(&self) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.discovery_url)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "HTTP {} from discovery endpoint",
                response.status()
            )));
        }

        let body: DiscoveryBody = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(body.issuer)
    }
}

#[async_trait]
impl IdentityProvider for KeycloakProvider {
    async fn user_info(&self, raw_token: &str) -> Result<UserInfo, ProviderError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(raw_token)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: UserInfoBody = response
                .json()
                .await
                .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
            Ok(UserInfo {
                username: body.preferred_username.unwrap_or_else(|| body.sub.clone()),
                subject: body.sub,
            })
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ProviderError::Unauthorized)
        } else {
            Err(ProviderError::Unavailable(format!(
                "HTTP {status} from userinfo endpoint"
            )))
        }
    }
}
