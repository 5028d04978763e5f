// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Store
//!
//! Single source of truth for who is logged in.
//!
//! ## Invariant
//!
//! `token`, `subject_id` and `role` are either all set or all unset, and
//! `profile` is only ever set alongside them. Every mutation goes through
//! [`SessionStore`], which writes durable storage first and only then
//! updates memory, so a failed write leaves the in-memory session untouched.
//!
//! Tokens whose claims cannot be decoded are discarded, never kept in a
//! degraded state.

use crate::auth::{decode_claims, Role, SubjectId};
use crate::models::{User, UserPatch};
use crate::storage::{
    KeyValueStore, StorageResult, ACCESS_TOKEN_KEY, ROLE_KEY, SESSION_KEYS, USER_ID_KEY,
};

/// Authentication state of the current client.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    /// Bearer credential; `None` means anonymous
    pub token: Option<String>,
    pub subject_id: Option<SubjectId>,
    pub role: Option<Role>,
    /// Full profile, present only after a successful profile fetch
    pub profile: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("subject_id", &self.subject_id)
            .field("role", &self.role)
            .field("profile", &self.profile)
            .finish()
    }
}

/// What [`SessionStore::rehydrate`] found in durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehydrateOutcome {
    /// No stored token
    Empty,
    /// Token, role and subject id restored as stored
    Restored,
    /// Token stored without role/subject id; both recovered from its claims
    Recovered,
    /// Token stored but undecodable; storage scrubbed
    Discarded,
    /// Storage could not be read; treated as no prior session
    Unavailable,
}

/// Owner of the [`Session`] and its durable copy.
pub struct SessionStore<S> {
    session: Session,
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Create an empty (anonymous) store over `storage`. Call
    /// [`rehydrate`](Self::rehydrate) to load a previous session.
    pub fn new(storage: S) -> Self {
        Self {
            session: Session::default(),
            storage,
        }
    }

    /// Current in-memory snapshot.
    pub fn get(&self) -> Session {
        self.session.clone()
    }

    /// Borrow the current session without cloning.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Install a freshly issued token with its identity claims.
    ///
    /// Any previous profile is dropped. The three durable entries are
    /// written in one atomic step before memory changes.
    pub fn set_authenticated(
        &mut self,
        token: String,
        subject_id: SubjectId,
        role: Role,
    ) -> StorageResult<()> {
        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, token.as_str()),
            (ROLE_KEY, role.as_str()),
            (USER_ID_KEY, subject_id.as_str()),
        ])?;

        tracing::info!(subject_id = %subject_id, role = %role, "Session authenticated");
        self.session = Session {
            token: Some(token),
            subject_id: Some(subject_id),
            role: Some(role),
            profile: None,
        };
        Ok(())
    }

    /// Replace the profile wholesale.
    ///
    /// Subject id and role are taken from the profile, overriding values
    /// decoded from the token. Ignored on an anonymous session.
    pub fn set_profile(&mut self, user: User) -> StorageResult<()> {
        if self.session.token.is_none() {
            tracing::warn!(subject_id = %user.id, "Ignoring profile for anonymous session");
            return Ok(());
        }

        self.persist_identity(&user.id, user.role)?;

        if self.session.subject_id.as_ref() != Some(&user.id) || self.session.role != Some(user.role)
        {
            tracing::info!(
                subject_id = %user.id,
                role = %user.role,
                "Profile overrides token identity"
            );
        }
        self.session.subject_id = Some(user.id.clone());
        self.session.role = Some(user.role);
        self.session.profile = Some(user);
        Ok(())
    }

    /// Merge `patch` into the current profile. No-op when no profile is set.
    pub fn patch_profile(&mut self, patch: UserPatch) -> StorageResult<()> {
        let Some(current) = self.session.profile.as_ref() else {
            tracing::debug!("No profile loaded, patch ignored");
            return Ok(());
        };

        let mut updated = current.clone();
        patch.apply(&mut updated);
        if updated.role != current.role {
            self.persist_identity(&updated.id, updated.role)?;
            self.session.role = Some(updated.role);
        }
        self.session.profile = Some(updated);
        Ok(())
    }

    /// Forget the session entirely.
    ///
    /// Memory is always cleared; the returned error only reports that the
    /// durable entries could not be removed.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.session = Session::default();
        self.storage.remove_many(&SESSION_KEYS)
    }

    /// Load the session persisted by a previous run.
    ///
    /// Never fails: missing entries default to unset and unreadable storage
    /// yields an anonymous session.
    pub fn rehydrate(&mut self) -> RehydrateOutcome {
        self.session = Session::default();

        let token = match self.storage.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Session storage unavailable, starting anonymous");
                return RehydrateOutcome::Unavailable;
            }
        };

        let Some(token) = token else {
            // Orphaned role/userId entries from an interrupted write
            if let Err(e) = self.storage.remove_many(&SESSION_KEYS) {
                tracing::warn!(error = %e, "Failed to scrub orphaned session entries");
            }
            return RehydrateOutcome::Empty;
        };

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding stored token with undecodable claims");
                if let Err(e) = self.storage.remove_many(&SESSION_KEYS) {
                    tracing::warn!(error = %e, "Failed to scrub discarded token");
                }
                return RehydrateOutcome::Discarded;
            }
        };

        let stored_role = self
            .read_entry(ROLE_KEY)
            .and_then(|r| Role::from_str(&r));
        let stored_subject = self
            .read_entry(USER_ID_KEY)
            .filter(|id| !id.trim().is_empty())
            .map(SubjectId::new);

        // Stored identity may come from the profile and wins over the claims
        if let (Some(subject_id), Some(role)) = (stored_subject, stored_role) {
            self.session = Session {
                token: Some(token),
                subject_id: Some(subject_id),
                role: Some(role),
                profile: None,
            };
            return RehydrateOutcome::Restored;
        }

        if let Err(e) = self.storage.set_many(&[
            (ROLE_KEY, claims.role.as_str()),
            (USER_ID_KEY, claims.subject_id.as_str()),
        ]) {
            tracing::warn!(error = %e, "Failed to persist recovered identity");
        }
        self.session = Session {
            token: Some(token),
            subject_id: Some(claims.subject_id),
            role: Some(claims.role),
            profile: None,
        };
        RehydrateOutcome::Recovered
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        self.storage.get(key).ok().flatten()
    }

    fn persist_identity(&self, subject_id: &SubjectId, role: Role) -> StorageResult<()> {
        self.storage
            .set_many(&[(ROLE_KEY, role.as_str()), (USER_ID_KEY, subject_id.as_str())])
    }
}
