// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! HTTP API: router assembly and endpoint handlers.

use axum::{
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{ServerErrorBody, UserErrorBody},
    models::{CreateItemRequest, CreateListRequest, ListItem, ShoppingList, User},
    state::AppState,
};

pub mod health;
pub mod lists;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/me", get(users::get_me))
        .route("/lists", get(lists::get_lists).post(lists::create_list))
        .route("/lists/{list_id}", get(lists::get_list))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health))
        .with_state(state)
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        health::health,
        users::get_me,
        lists::get_lists,
        lists::create_list,
        lists::get_list,
    ),
    components(
        schemas(
            User,
            ShoppingList,
            ListItem,
            CreateListRequest,
            CreateItemRequest,
            UserErrorBody,
            ServerErrorBody,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and configuration checks"),
        (name = "Users", description = "Authenticated caller identity"),
        (name = "Lists", description = "Shopping-list management"),
    )
)]
struct ApiDoc;
