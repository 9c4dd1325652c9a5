// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Domain models and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A locally mirrored identity-provider user.
///
/// Created exactly once, on the first successful token check for a subject;
/// `subject` is unique and never changes afterwards.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    /// Stable subject identifier assigned by the identity provider.
    pub subject: String,
    /// Display name as reported by the identity provider at first sighting.
    pub username: String,
    /// When the local record was created (UTC).
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A shopping list owned by a single user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingList {
    pub id: Uuid,
    pub name: String,
    /// Subject of the owning user.
    pub creator: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<ListItem>,
}

/// One entry on a shopping list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListItem {
    pub id: Uuid,
    pub name: String,
    /// Free-form amount, e.g. "2" or "500 g".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    pub collected: bool,
}

/// Payload for `POST /v1/lists`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateListRequest {
    pub name: String,
    #[serde(default)]
    pub items: Vec<CreateItemRequest>,
}

/// An item within a [`CreateListRequest`].
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub amount: Option<String>,
}
