// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::session::{Session, SessionStore};
use crate::storage::KeyValueStore;

/// Shared handle to the session, constructed once at startup and cloned
/// into every component that needs it.
///
/// The write lock is the single-writer guard around [`SessionStore`]
/// mutations; it is never held across a network call.
pub struct SessionContext<S> {
    store: Arc<RwLock<SessionStore<S>>>,
}

impl<S> Clone for SessionContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> SessionContext<S> {
    pub fn new(storage: S) -> Self {
        Self {
            store: Arc::new(RwLock::new(SessionStore::new(storage))),
        }
    }

    /// Current session snapshot.
    pub async fn snapshot(&self) -> Session {
        self.store.read().await.get()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SessionStore<S>> {
        self.store.read().await
    }

    /// Exclusive access for mutations; reserved for the auth service.
    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, SessionStore<S>> {
        self.store.write().await
    }
}
