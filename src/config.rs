// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `KC_URL` | Keycloak base URL | Required |
//! | `KC_REALM` | Keycloak realm name | Required |
//! | `KC_REALM_PUBLIC_KEY` | Base64-encoded DER (PKIX) RSA public key of the realm | Required |
//! | `KC_CLIENT_ID` | OAuth client id registered for this service | Required |
//! | `KC_CLIENT_SECRET` | OAuth client secret | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

/// Everything the process needs, resolved before the server starts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

/// Identity-provider settings for the authentication gate.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Keycloak base URL, e.g. `https://id.example.com`.
    pub server_url: String,
    /// Realm whose users this service accepts.
    pub realm: String,
    /// Base64-encoded DER (PKIX) RSA public key of the realm. Parsed once
    /// at Authenticator construction.
    pub realm_public_key: String,
    /// OAuth client id registered for this service.
    #[allow(dead_code)] // reserved for token-exchange flows
    pub client_id: String,
    /// OAuth client secret. Not used by the token gate itself.
    #[allow(dead_code)] // reserved for token-exchange flows
    pub client_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_raw = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw))?;

        let server_url = required("KC_URL")?;
        Url::parse(&server_url).map_err(|source| ConfigError::InvalidUrl {
            name: "KC_URL",
            source,
        })?;

        Ok(Self {
            host,
            port,
            auth: AuthConfig {
                server_url,
                realm: required("KC_REALM")?,
                realm_public_key: required("KC_REALM_PUBLIC_KEY")?,
                client_id: required("KC_CLIENT_ID")?,
                client_secret: required("KC_CLIENT_SECRET")?,
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}
