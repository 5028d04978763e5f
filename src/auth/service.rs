// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session transitions that involve the remote API.
//!
//! [`AuthService`] is the only writer of the session. Every failure is
//! returned as an [`AuthError`]; a failed profile fetch additionally clears
//! the session, because a token the server will not honor must not be
//! presented as valid to the rest of the client.

use std::time::Duration;

use super::claims::decode_claims;
use super::error::AuthError;
use crate::api::{ApiError, AuthApi};
use crate::models::{Credentials, Registration, UserPatch};
use crate::session::{RehydrateOutcome, SessionStore};
use crate::state::SessionContext;
use crate::storage::KeyValueStore;

/// Default deadline for startup validation.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(15);

/// Proof that [`AuthService::bootstrap`] has completed.
///
/// Only `bootstrap` can construct it; the navigator requires one, so no
/// route is evaluated against an unvalidated session.
#[derive(Debug)]
pub struct Bootstrapped {
    rehydrated: RehydrateOutcome,
    authenticated: bool,
}

impl Bootstrapped {
    /// What durable storage contained at startup.
    pub fn rehydrated(&self) -> RehydrateOutcome {
        self.rehydrated
    }

    /// Whether a server-validated session survived bootstrap.
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }
}

pub struct AuthService<A, S> {
    api: A,
    session: SessionContext<S>,
    bootstrap_timeout: Duration,
}

impl<A: AuthApi, S: KeyValueStore> AuthService<A, S> {
    pub fn new(api: A, session: SessionContext<S>) -> Self {
        Self {
            api,
            session,
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
        }
    }

    /// Override the startup validation deadline.
    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    pub fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    /// Exchange credentials for a token, then hydrate the profile.
    ///
    /// On any failure before the token is stored the session is unchanged.
    /// If the follow-up profile fetch fails the session is cleared and that
    /// error is returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let response = self
            .api
            .login(credentials)
            .await
            .map_err(|e| match e {
                ApiError::Status {
                    status: 400 | 401, ..
                } => AuthError::InvalidCredentials,
                other => other.into(),
            })
            .inspect_err(|e| {
                tracing::warn!(error = %e, code = e.error_code(), "Login failed");
            })?;

        let claims = decode_claims(&response.access).inspect_err(|e| {
            tracing::warn!(error = %e, "Login issued a token with unusable claims");
        })?;
        if let Some(expires_at) = claims.expires_at {
            tracing::debug!(%expires_at, "Issued token expiry");
        }

        self.session
            .write()
            .await
            .set_authenticated(response.access, claims.subject_id, claims.role)
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to persist login"))?;

        self.fetch_user().await
    }

    /// Create an account and adopt the issued token and profile.
    pub async fn register(&self, registration: &Registration) -> Result<(), AuthError> {
        let response = self
            .api
            .register(registration)
            .await
            .map_err(AuthError::from)
            .inspect_err(|e| {
                tracing::warn!(error = %e, code = e.error_code(), "Registration failed");
            })?;

        let claims = decode_claims(&response.token).inspect_err(|e| {
            tracing::warn!(error = %e, "Registration issued a token with unusable claims");
        })?;

        let mut store = self.session.write().await;
        store.set_authenticated(response.token, claims.subject_id, claims.role)?;
        if let Err(e) = store.set_profile(response.user) {
            tracing::warn!(error = %e, "Failed to persist registered profile");
            clear_session(&mut store, "registration incomplete");
            return Err(e.into());
        }
        Ok(())
    }

    /// Refresh the profile for the current token.
    ///
    /// Succeeds without a request when anonymous. Any failure clears the
    /// session.
    pub async fn fetch_user(&self) -> Result<(), AuthError> {
        let Some(token) = self.session.read().await.session().token.clone() else {
            tracing::debug!("No token, skipping profile fetch");
            return Ok(());
        };

        let result = self.api.current_user(&token).await;

        let mut store = self.session.write().await;
        if store.session().token.as_deref() != Some(token.as_str()) {
            // Logout or a new login happened while the request was in flight
            tracing::debug!("Session changed during profile fetch, discarding response");
            return Ok(());
        }

        match result {
            Ok(user) => {
                if let Err(e) = store.set_profile(user) {
                    tracing::warn!(error = %e, "Failed to persist profile");
                    clear_session(&mut store, "profile not persisted");
                    return Err(e.into());
                }
                Ok(())
            }
            Err(e) => {
                let err = AuthError::from(e);
                tracing::warn!(
                    error = %err,
                    code = err.error_code(),
                    "Profile fetch failed, treating session as unauthenticated"
                );
                clear_session(&mut store, "profile fetch failed");
                Err(err)
            }
        }
    }

    /// Merge local profile edits into the session.
    pub async fn patch_profile(&self, patch: UserPatch) -> Result<(), AuthError> {
        self.session.write().await.patch_profile(patch)?;
        Ok(())
    }

    /// Forget the session. Never contacts the server.
    pub async fn logout(&self) {
        clear_session(&mut *self.session.write().await, "logout");
    }

    /// Rehydrate from durable storage and validate against the server.
    ///
    /// Always completes within the bootstrap deadline. A timeout counts as a
    /// failed validation.
    pub async fn bootstrap(&self) -> Bootstrapped {
        let rehydrated = self.session.write().await.rehydrate();
        tracing::info!(outcome = ?rehydrated, "Session rehydrated");

        let deadline = tokio::time::timeout(self.bootstrap_timeout, self.fetch_user());
        let validation = match deadline.await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.bootstrap_timeout.as_secs_f64(),
                    "Session validation timed out"
                );
                clear_session(&mut *self.session.write().await, "validation timed out");
                Err(AuthError::Timeout)
            }
        };

        let authenticated =
            validation.is_ok() && self.session.read().await.session().is_authenticated();
        tracing::info!(authenticated, "Bootstrap complete");

        Bootstrapped {
            rehydrated,
            authenticated,
        }
    }
}

fn clear_session<S: KeyValueStore>(store: &mut SessionStore<S>, reason: &'static str) {
    let subject_id = store.session().subject_id.clone();
    match store.clear() {
        Ok(()) => tracing::info!(subject_id = ?subject_id, reason, "Session cleared"),
        Err(e) => tracing::warn!(
            error = %e,
            reason,
            "Session cleared in memory but durable entries remain"
        ),
    }
}
