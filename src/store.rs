// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shoplist Contributors

//! Local storage for users and shopping lists.
//!
//! The authentication gate only depends on the [`UserStore`] trait: existence
//! check, creation, lookup. An absent row is an `Ok(None)`/`Ok(false)` result,
//! never an error; errors mean the query itself failed. Subject uniqueness is
//! enforced here — a duplicate insert fails with
//! [`StoreError::DuplicateSubject`], which the reconciler treats as a benign
//! first-use race rather than a fault.
//!
//! [`InMemoryStore`] is a cheap `Clone` handle around shared maps, good
//! enough for a single-process deployment and for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ShoppingList, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A user row with this subject already exists. On the first-use path
    /// this is the uniqueness constraint doing its job, not a failure.
    #[error("user with subject {0:?} already exists")]
    DuplicateSubject(String),
    /// The query itself failed (backend unavailable, corrupt state).
    #[error("storage query failed: {0}")]
    Query(String),
}

/// Storage interface the authentication gate depends on.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn has_user(&self, subject: &str) -> Result<bool, StoreError>;
    async fn create_user(&self, user: User) -> Result<(), StoreError>;
    async fn get_user(&self, subject: &str) -> Result<Option<User>, StoreError>;
}

/// In-memory store; users keyed by subject, lists keyed by id.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    lists: Arc<RwLock<HashMap<Uuid, ShoppingList>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lists_for_user(&self, subject: &str) -> Vec<ShoppingList> {
        self.lists
            .read()
            .await
            .values()
            .filter(|list| list.creator == subject)
            .cloned()
            .collect()
    }

    pub async fn list_by_id(&self, list_id: &Uuid) -> Option<ShoppingList> {
        self.lists.read().await.get(list_id).cloned()
    }

    pub async fn insert_list(&self, list: ShoppingList) -> ShoppingList {
        self.lists.write().await.insert(list.id, list.clone());
        list
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn has_user(&self, subject: &str) -> Result<bool, StoreError> {
        Ok(self.users.read().await.contains_key(subject))
    }

    async fn create_user(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.subject) {
            return Err(StoreError::DuplicateSubject(user.subject));
        }
        users.insert(user.subject.clone(), user);
        Ok(())
    }

    async fn get_user(&self, subject: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(subject).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(subject: &str) -> User {
        User {
            subject: subject.to_string(),
            username: format!("{subject}-name"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn absent_user_is_not_an_error() {
        let store = InMemoryStore::new();
        assert!(!store.has_user("nobody").await.unwrap());
        assert!(store.get_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_then_lookup_roundtrips() {
        let store = InMemoryStore::new();
        store.create_user(user("subj-1")).await.unwrap();

        assert!(store.has_user("subj-1").await.unwrap());
        let found = store.get_user("subj-1").await.unwrap().unwrap();
        assert_eq!(found.username, "subj-1-name");
    }

    #[tokio::test]
    async fn duplicate_subject_is_rejected() {
        let store = InMemoryStore::new();
        store.create_user(user("subj-1")).await.unwrap();

        let err = store.create_user(user("subj-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSubject(_)));

        // The original row survives.
        let found = store.get_user("subj-1").await.unwrap().unwrap();
        assert_eq!(found.username, "subj-1-name");
    }

    #[tokio::test]
    async fn lists_are_filtered_by_creator() {
        let store = InMemoryStore::new();
        let mine = ShoppingList {
            id: Uuid::new_v4(),
            name: "Groceries".to_string(),
            creator: "subj-1".to_string(),
            created_at: Utc::now(),
            items: Vec::new(),
        };
        let theirs = ShoppingList {
            id: Uuid::new_v4(),
            name: "Hardware".to_string(),
            creator: "subj-2".to_string(),
            created_at: Utc::now(),
            items: Vec::new(),
        };
        store.insert_list(mine.clone()).await;
        store.insert_list(theirs).await;

        let lists = store.lists_for_user("subj-1").await;
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, mine.id);

        assert_eq!(store.list_by_id(&mine.id).await.unwrap().name, "Groceries");
    }
}
