// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

use std::sync::Arc;

use crate::auth::Authenticator;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: InMemoryStore,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(store: InMemoryStore, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}
