// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Shopping-list endpoints.
//!
//! All handlers run behind the [`Auth`] guard; `user.subject` is the
//! verified caller and the only identity consulted for ownership checks.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::{CreateListRequest, ListItem, ShoppingList};
use crate::state::AppState;

/// List all shopping lists owned by the caller.
#[utoipa::path(
    get,
    path = "/v1/lists",
    tag = "Lists",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Lists owned by the caller", body = [ShoppingList]),
        (status = 401, description = "Missing, expired or invalid token"),
    )
)]
pub async fn get_lists(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Json<Vec<ShoppingList>> {
    Json(state.store.lists_for_user(&user.subject).await)
}

/// Create a shopping list, optionally with initial items.
#[utoipa::path(
    post,
    path = "/v1/lists",
    tag = "Lists",
    security(("bearer" = [])),
    request_body = CreateListRequest,
    responses(
        (status = 200, description = "The created list", body = ShoppingList),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Missing, expired or invalid token"),
    )
)]
pub async fn create_list(
    Auth(user): Auth,
    State(state): State<AppState>,
    payload: Result<Json<CreateListRequest>, JsonRejection>,
) -> Result<Json<ShoppingList>, ApiError> {
    // Funnel body-parse failures through the classifier like any other
    // user fault; the caller sees the generic 400 body.
    let Json(request) = payload.map_err(|e| ApiError::user(e.to_string()))?;

    if request.name.trim().is_empty() {
        return Err(ApiError::user("list name must not be empty"));
    }

    let items = request
        .items
        .into_iter()
        .map(|item| ListItem {
            id: Uuid::new_v4(),
            name: item.name,
            amount: item.amount,
            collected: false,
        })
        .collect();

    let list = ShoppingList {
        id: Uuid::new_v4(),
        name: request.name,
        creator: user.subject,
        created_at: Utc::now(),
        items,
    };

    Ok(Json(state.store.insert_list(list).await))
}

/// Fetch a single list by id. Only the owner may read it.
#[utoipa::path(
    get,
    path = "/v1/lists/{list_id}",
    tag = "Lists",
    security(("bearer" = [])),
    params(("list_id" = Uuid, Path, description = "List id")),
    responses(
        (status = 200, description = "The requested list", body = ShoppingList),
        (status = 401, description = "Not authenticated, or list not owned by caller"),
        (status = 404, description = "No such list"),
    )
)]
pub async fn get_list(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<Json<ShoppingList>, ApiError> {
    let list = state
        .store
        .list_by_id(&list_id)
        .await
        .ok_or_else(|| ApiError::with_status(StatusCode::NOT_FOUND, "No list found"))?;

    if list.creator != user.subject {
        return Err(ApiError::with_status(
            StatusCode::UNAUTHORIZED,
            "List not owned by user",
        ));
    }

    Ok(Json(list))
}
