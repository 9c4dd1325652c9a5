// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! # Authentication Module
//!
//! Bearer-token authentication against a Keycloak realm.
//!
//! ## Flow
//!
//! 1. Client obtains a JWT from Keycloak and sends
//!    `Authorization: Bearer <token>`
//! 2. The [`Auth`][extractor::Auth] extractor (request guard):
//!    - extracts the bearer token (missing/malformed header → 401 before
//!      anything else runs)
//!    - hands it to the [`Authenticator`]
//! 3. The Authenticator:
//!    - verifies signature (RSA only) and expiry against the configured
//!      realm public key — pure, no I/O
//!    - confirms the subject with the provider's user-info endpoint
//!      (catches revocation a cached public key cannot)
//!    - mirrors the identity into local storage on first sighting
//!
//! ## Failure classification
//!
//! Invalid, expired and revoked tokens are expected negatives (401).
//! A provider outage, storage failure or misconfigured realm key is a
//! server fault (500 with tracking code). The split is decided at the
//! point of failure and carried unchanged to the HTTP boundary.

pub mod authenticator;
pub mod extractor;
pub mod provider;
pub mod verifier;

pub use authenticator::{AuthDecision, AuthenticatedUser, Authenticator};
pub use extractor::Auth;
pub use provider::{IdentityProvider, KeycloakProvider};
