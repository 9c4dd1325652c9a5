// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Token check orchestration.
//!
//! [`Authenticator::check_token`] runs the pure verifier first and, only on
//! a valid signature, reconciles the subject with the identity provider and
//! the local user store. The outcome is tri-state:
//!
//! - `Ok(Allowed)` - token verified, subject confirmed, local record present
//!   (created on first sighting);
//! - `Ok(Denied)` - expected negative: malformed/expired/revoked token.
//!   Not a fault, no error body beyond the guard's 401;
//! - `Err(server fault)` - the check itself could not be completed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::models::User;
use crate::store::{StoreError, UserStore};

use super::provider::{IdentityProvider, ProviderError};
use super::verifier::{verify_token, KeyError, RealmKey, VerificationOutcome};

/// The verified caller identity handed to endpoint handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Canonical subject as confirmed by the identity provider.
    pub subject: String,
}

/// Result of a completed token check.
#[derive(Debug)]
pub enum AuthDecision {
    Allowed(AuthenticatedUser),
    /// Expected negative outcome; the guard turns this into a 401.
    Denied,
}

pub struct Authenticator {
    /// Parsed once at construction and immutable for the process lifetime.
    /// A parse failure is kept so every check surfaces it as a server fault
    /// instead of silently denying callers for a configuration mistake.
    key: Result<RealmKey, KeyError>,
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(
        config: &AuthConfig,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        let key = RealmKey::from_base64_der(&config.realm_public_key);
        if let Err(ref e) = key {
            error!(error = %e, "realm public key failed to parse; all token checks will fail");
        }

        Self {
            key,
            provider,
            store,
        }
    }

    /// Whether the configured realm key parsed. Reported by the health
    /// endpoint.
    pub fn key_ok(&self) -> bool {
        self.key.is_ok()
    }

    /// Check a raw bearer token end to end.
    pub async fn check_token(&self, raw_token: &str) -> Result<AuthDecision, ApiError> {
        let key = match &self.key {
            Ok(key) => key,
            Err(e) => {
                return Err(ApiError::server(format!(
                    "realm public key is misconfigured: {e}"
                )));
            }
        };

        match verify_token(raw_token, key) {
            VerificationOutcome::Invalid(reason) => {
                debug!(%reason, "rejecting token that failed verification");
                Ok(AuthDecision::Denied)
            }
            VerificationOutcome::Expired => {
                info!("short-circuiting request, token expired");
                Ok(AuthDecision::Denied)
            }
            VerificationOutcome::Valid(subject) => self.reconcile(&subject, raw_token).await,
        }
    }

    /// Confirm the subject with the provider and mirror it locally on first
    /// sighting. `subject` is only used for logging; the canonical identity
    /// comes from the provider's answer.
    async fn reconcile(&self, subject: &str, raw_token: &str) -> Result<AuthDecision, ApiError> {
        let info = match self.provider.user_info(raw_token).await {
            Ok(info) => info,
            Err(ProviderError::Unauthorized) => {
                // Revoked or unknown despite a valid signature. The provider's
                // verdict wins over any local record.
                info!(subject, "identity provider no longer honors token");
                return Ok(AuthDecision::Denied);
            }
            Err(e @ ProviderError::Unavailable(_)) => {
                return Err(ApiError::server(e.to_string())
                    .context("unable to get user info from identity provider"));
            }
        };

        let user = AuthenticatedUser {
            subject: info.subject.clone(),
        };

        match self.store.has_user(&info.subject).await {
            Ok(true) => Ok(AuthDecision::Allowed(user)),
            Ok(false) => {
                let record = User {
                    subject: info.subject.clone(),
                    username: info.username,
                    created_at: Utc::now(),
                };
                match self.store.create_user(record).await {
                    Ok(()) => {
                        info!(subject = %info.subject, "provisioned local user on first sighting");
                        Ok(AuthDecision::Allowed(user))
                    }
                    // Two first-use requests raced; the row exists now, which
                    // is all reconciliation needs.
                    Err(StoreError::DuplicateSubject(_)) => Ok(AuthDecision::Allowed(user)),
                    Err(e) => {
                        Err(ApiError::server(e.to_string()).context("failed to create new user"))
                    }
                }
            }
            Err(e) => Err(ApiError::server(e.to_string()).context("failed to look up user")),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::auth::provider::testing::{FakeProvider, Script};
    use crate::auth::verifier::fixtures;
    use crate::store::InMemoryStore;

    const FUTURE_EXP: i64 = 4_102_444_800;
    const PAST_EXP: i64 = 946_684_800;

    fn auth_config(realm_public_key: &str) -> AuthConfig {
        AuthConfig {
            server_url: "https://id.example.com".to_string(),
            realm: "shoppers".to_string(),
            realm_public_key: realm_public_key.to_string(),
            client_id: "shoplist".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    fn authenticator(provider: FakeProvider, store: Arc<dyn UserStore>) -> Authenticator {
        Authenticator::new(
            &auth_config(fixtures::REALM_PUBLIC_KEY_B64),
            Arc::new(provider),
            store,
        )
    }

    #[tokio::test]
    async fn first_sighting_provisions_exactly_one_user() {
        let store = InMemoryStore::new();
        let auth = authenticator(
            FakeProvider::known("subj-1", "alice"),
            Arc::new(store.clone()),
        );
        let token = fixtures::signed_token("subj-1", FUTURE_EXP);

        let decision = auth.check_token(&token).await.unwrap();
        assert!(matches!(decision, AuthDecision::Allowed(ref u) if u.subject == "subj-1"));

        let user = store.get_user("subj-1").await.unwrap().unwrap();
        assert_eq!(user.username, "alice");

        // Second check finds the record and performs no further writes.
        let decision = auth.check_token(&token).await.unwrap();
        assert!(matches!(decision, AuthDecision::Allowed(_)));
        let user_again = store.get_user("subj-1").await.unwrap().unwrap();
        assert_eq!(user_again.created_at, user.created_at);
    }

    /// Store that answers "absent" to every existence probe, forcing both
    /// racers onto the creation path; the second insert hits the uniqueness
    /// constraint.
    struct RacingStore {
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl UserStore for RacingStore {
        async fn has_user(&self, _subject: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn create_user(&self, user: User) -> Result<(), StoreError> {
            if self.inserts.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(())
            } else {
                Err(StoreError::DuplicateSubject(user.subject))
            }
        }

        async fn get_user(&self, _subject: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn losing_the_first_use_race_still_authenticates() {
        let store = Arc::new(RacingStore {
            inserts: AtomicUsize::new(0),
        });
        let auth = authenticator(FakeProvider::known("subj-1", "alice"), store.clone());
        let token = fixtures::signed_token("subj-1", FUTURE_EXP);

        let (first, second) = tokio::join!(auth.check_token(&token), auth.check_token(&token));
        assert!(matches!(first.unwrap(), AuthDecision::Allowed(_)));
        assert!(matches!(second.unwrap(), AuthDecision::Allowed(_)));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn provider_unauthorized_is_denied_not_a_fault() {
        let auth = authenticator(
            FakeProvider::always(Script::Unauthorized),
            Arc::new(InMemoryStore::new()),
        );
        let token = fixtures::signed_token("subj-1", FUTURE_EXP);

        let decision = auth.check_token(&token).await.unwrap();
        assert!(matches!(decision, AuthDecision::Denied));
    }

    #[tokio::test]
    async fn provider_outage_is_a_server_fault() {
        let auth = authenticator(
            FakeProvider::always(Script::Unavailable),
            Arc::new(InMemoryStore::new()),
        );
        let token = fixtures::signed_token("subj-1", FUTURE_EXP);

        let err = auth.check_token(&token).await.unwrap_err();
        assert!(err.is_server_fault());
    }

    #[tokio::test]
    async fn expired_token_is_denied_without_touching_the_provider() {
        // An unavailable provider would turn any contact into a server fault,
        // so a Denied outcome proves the check never left the verifier.
        let auth = authenticator(
            FakeProvider::always(Script::Unavailable),
            Arc::new(InMemoryStore::new()),
        );
        let token = fixtures::signed_token("subj-1", PAST_EXP);

        let decision = auth.check_token(&token).await.unwrap();
        assert!(matches!(decision, AuthDecision::Denied));
    }

    #[tokio::test]
    async fn misconfigured_realm_key_is_a_server_fault() {
        let auth = Authenticator::new(
            &auth_config("not-a-valid-key"),
            Arc::new(FakeProvider::known("subj-1", "alice")),
            Arc::new(InMemoryStore::new()),
        );
        assert!(!auth.key_ok());

        let token = fixtures::signed_token("subj-1", FUTURE_EXP);
        let err = auth.check_token(&token).await.unwrap_err();
        assert!(err.is_server_fault());
    }

    #[tokio::test]
    async fn store_failure_during_lookup_is_a_server_fault() {
        struct BrokenStore;

        #[async_trait]
        impl UserStore for BrokenStore {
            async fn has_user(&self, _subject: &str) -> Result<bool, StoreError> {
                Err(StoreError::Query("connection refused".to_string()))
            }

            async fn create_user(&self, _user: User) -> Result<(), StoreError> {
                Err(StoreError::Query("connection refused".to_string()))
            }

            async fn get_user(&self, _subject: &str) -> Result<Option<User>, StoreError> {
                Err(StoreError::Query("connection refused".to_string()))
            }
        }

        let auth = authenticator(FakeProvider::known("subj-1", "alice"), Arc::new(BrokenStore));
        let token = fixtures::signed_token("subj-1", FUTURE_EXP);

        let err = auth.check_token(&token).await.unwrap_err();
        assert!(err.is_server_fault());
    }
}
