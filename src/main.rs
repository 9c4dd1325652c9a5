// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

mod api;
mod auth;
mod config;
mod error;
mod models;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{Authenticator, KeycloakProvider};
use config::AppConfig;
use state::AppState;
use store::InMemoryStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let store = InMemoryStore::new();
    let provider = Arc::new(KeycloakProvider::new(
        &config.auth.server_url,
        &config.auth.realm,
    ));

    // Catch a mistyped realm or URL early without holding up startup.
    let check = provider.clone();
    tokio::spawn(async move {
        match check.sanity_check().await {
            Ok(issuer) => info!(%issuer, "keycloak sanity check done"),
            Err(e) => error!(error = %e, "keycloak sanity check failed"),
        }
    });

    let authenticator = Arc::new(Authenticator::new(
        &config.auth,
        provider,
        Arc::new(store.clone()),
    ));
    let state = AppState::new(store, authenticator);
    let app = api::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("failed to parse bind address");

    info!(%addr, "shoplist server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received, draining connections");
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
